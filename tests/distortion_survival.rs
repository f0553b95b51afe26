// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Recovery under post-embedding distortion: additive pixel noise and a
//! mild JPEG re-encode. Both stay well inside the quantization margin,
//! so recovery is expected every time, not statistically.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tidemark::{decode, embed, WatermarkConfig};

const FP: &str = "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a";

fn textured_image(width: u32, height: u32, seed: u64) -> RgbImage {
    // Mid-range values leave headroom for both the embedding nudges and
    // the distortion applied on top.
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| {
        Rgb([
            rng.gen_range(64..=192),
            rng.gen_range(64..=192),
            rng.gen_range(64..=192),
        ])
    })
}

fn smooth_image(width: u32, height: u32) -> RgbImage {
    let denom = (width + height).saturating_sub(2).max(1);
    RgbImage::from_fn(width, height, |x, y| {
        let v = (48 + (x + y) * 160 / denom) as u8;
        Rgb([v, v, v])
    })
}

fn add_uniform_noise(img: &mut RgbImage, amplitude: i16, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for pixel in img.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let noisy = *channel as i16 + rng.gen_range(-amplitude..=amplitude);
            *channel = noisy.clamp(0, 255) as u8;
        }
    }
}

fn recompress_jpeg(img: &RgbImage, quality: u8) -> RgbImage {
    let mut bytes = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))
        .unwrap();
    image::load_from_memory(&bytes).unwrap().to_rgb8()
}

#[test]
fn survives_additive_noise() {
    // Amplitude 3 shifts an approximation coefficient by at most 12,
    // inside the +-20 decision margin even before voting kicks in.
    let img = textured_image(512, 512, 17);
    let cfg = WatermarkConfig::default();

    let mut marked = embed(&img, FP, &cfg).unwrap();
    add_uniform_noise(&mut marked, 3, 99);

    let recovered = decode(&marked, &cfg).unwrap();
    assert_eq!(recovered, Some(FP.parse().unwrap()));
}

#[test]
fn survives_noise_with_single_tile() {
    // No voting redundancy at 32x256; the margin alone must carry it.
    let img = textured_image(32, 256, 5);
    let cfg = WatermarkConfig::default();

    let mut marked = embed(&img, FP, &cfg).unwrap();
    add_uniform_noise(&mut marked, 2, 41);

    assert_eq!(decode(&marked, &cfg).unwrap(), Some(FP.parse().unwrap()));
}

#[test]
fn survives_jpeg_quality_95() {
    let img = smooth_image(512, 512);
    let cfg = WatermarkConfig::default();

    let marked = embed(&img, FP, &cfg).unwrap();
    let recompressed = recompress_jpeg(&marked, 95);
    assert_eq!(recompressed.dimensions(), (512, 512));

    let recovered = decode(&recompressed, &cfg).unwrap();
    assert_eq!(
        recovered,
        Some(FP.parse().unwrap()),
        "quality-95 re-encode should stay inside the margin"
    );
}

#[test]
fn unmarked_image_still_none_after_jpeg() {
    let img = textured_image(256, 256, 23);
    let cfg = WatermarkConfig::default();
    let recompressed = recompress_jpeg(&img, 95);
    assert_eq!(decode(&recompressed, &cfg).unwrap(), None);
}
