use std::path::Path;

/// Little-endian TIFF with an Exif IFD holding only `DateTimeOriginal`, laid out like a CR2 header.
pub fn raw_frame(datetime: &str) -> Vec<u8> {
    let mut value = datetime.as_bytes().to_vec();
    value.push(0);

    let exif_ifd: u32 = 8 + 2 + 12 + 4;
    let value_offset: u32 = exif_ifd + 2 + 12 + 4;

    let mut buf = b"II".to_vec();
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());

    for (tag, kind, count, offset) in [
        (0x8769u16, 4u16, 1u32, exif_ifd),
        (0x9003u16, 2u16, value.len() as u32, value_offset),
    ] {
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&kind.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
    }

    buf.extend_from_slice(&value);
    buf
}

pub fn write_frame(lights: &Path, base: &str, quality: f64, background: f64, nstars: u32, datetime: &str) {
    std::fs::write(lights.join(format!("{}.CR2", base)), raw_frame(datetime)).unwrap();
    let report = format!(
        "OverallQuality = {:.4}\nRedXShift = 0.0000\nSkyBackground = {:.4}\nNrStars = {}\nStar0\n\tIntensity = 0.5\n",
        quality, background, nstars
    );
    std::fs::write(lights.join(format!("{}.Info.txt", base)), report).unwrap();
}
