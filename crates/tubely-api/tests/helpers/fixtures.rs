use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;

/// Bytes standing in for an MP4 file; the fake tools never parse them.
pub fn fake_mp4() -> Bytes {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.extend(std::iter::repeat(0xAB).take(4096));
    Bytes::from(data)
}

/// Signature bytes of a PNG file.
pub fn fake_png() -> Bytes {
    Bytes::from_static(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR")
}

pub fn video_form(data: Bytes, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", "ignored")
        .add_part(
            "video",
            Part::bytes(data).file_name(file_name).mime_type(mime_type),
        )
}

pub fn thumbnail_form(data: Bytes, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(data).file_name(file_name).mime_type(mime_type),
    )
}
