//! Image alt-text enhancement.

use tracing::debug;

use seopress_shared::ImageRef;

use crate::generation::GenerationRequest;
use crate::prompts::{self, PromptParams};
use crate::tasks::{TaskRunner, image_alt_options};

/// Return a copy of `images` with regenerated alt text where applicable.
///
/// - no images: unchanged
/// - one image whose alt is still the raw title: one generation call
/// - several images: one batch of concurrent calls, applied by position
///
/// Any failure leaves the affected alt text as it was.
pub async fn enhance_image_metadata(
    runner: &TaskRunner<'_>,
    images: &[ImageRef],
    params: &PromptParams,
) -> Vec<ImageRef> {
    let mut enhanced = images.to_vec();

    match enhanced.len() {
        0 => {}
        1 => {
            if enhanced[0].alt == params.title {
                if let Some(alt) = runner.image_alt(params, None).await {
                    enhanced[0].alt = alt;
                }
            } else {
                debug!("image alt already customized, skipping");
            }
        }
        total => {
            let requests: Vec<GenerationRequest> = (1..=total)
                .map(|index| {
                    GenerationRequest::new(
                        prompts::image_alt_prompt(params, Some((index, total))),
                        image_alt_options(),
                    )
                })
                .collect();

            if let Some(alts) = runner.image_alt_batch(&requests).await {
                for (image, alt) in enhanced.iter_mut().zip(alts) {
                    let alt = alt.trim();
                    if !alt.is_empty() {
                        image.alt = alt.to_string();
                    }
                }
            }
        }
    }

    enhanced
}
