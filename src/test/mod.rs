//! Fixtures shared by the unit tests.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use uuid::Uuid;

use crate::utils::Claims;

pub const SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "----editor-upload-boundary";

/// PNG with noisy pixels so the encoded size grows with the dimensions.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x2545_f491;
    let img = RgbImage::from_fn(width, height, |_, _| {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [r, g, b, _] = seed.to_le_bytes();
        Rgb([r, g, b])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// `multipart/form-data` body with one file part.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn token(username: &str, is_staff: bool) -> String {
    token_for(&Uuid::now_v7(), username, is_staff)
}

pub fn token_for(id: &Uuid, username: &str, is_staff: bool) -> String {
    Claims::new(id, username, is_staff, 3600).encode(SECRET.as_bytes()).unwrap()
}
