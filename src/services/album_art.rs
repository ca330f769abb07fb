// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Album art variant selection.
//!
//! Spotify offers each album cover in a few sizes. We pick the cheapest one
//! that is still big enough for the device's thumbnail and hand the device a
//! URL on this server that will crop, resample and transcode it.

use crate::models::ImageVariant;

/// Pick the smallest variant covering `target_width x target_height`.
///
/// A variant covers the target when both of its dimensions are at least the
/// target's. Among covering variants the smallest area wins (earlier entries
/// win ties). If nothing covers, the first variant is used and will be
/// upscaled. Returns `None` for an empty list or a non-positive target.
pub fn select_best_fit(
    variants: &[ImageVariant],
    target_width: i64,
    target_height: i64,
) -> Option<&ImageVariant> {
    if target_width <= 0 || target_height <= 0 {
        return None;
    }

    let covering = variants
        .iter()
        .filter(|v| v.width >= target_width && v.height >= target_height)
        .fold(None::<&ImageVariant>, |best, v| match best {
            Some(b) if area(b) <= area(v) => Some(b),
            _ => Some(v),
        });

    covering.or_else(|| variants.first())
}

fn area(variant: &ImageVariant) -> i128 {
    i128::from(variant.width) * i128::from(variant.height)
}

/// Same-origin thumbnail URL for the best-fit variant, or `""` if none.
pub fn best_fit_art_url(
    server_url: &str,
    variants: &[ImageVariant],
    target_width: i64,
    target_height: i64,
) -> String {
    match select_best_fit(variants, target_width, target_height) {
        Some(variant) => thumbnail_url(server_url, &variant.url, target_width, target_height),
        None => String::new(),
    }
}

/// URL of the art endpoint rendering `source_url` at the given size.
pub fn thumbnail_url(server_url: &str, source_url: &str, width: i64, height: i64) -> String {
    format!(
        "{}/spotify/currently-playing-art?url={}&thumbnailWidth={}&thumbnailHeight={}",
        server_url,
        urlencoding::encode(source_url),
        width,
        height
    )
}
