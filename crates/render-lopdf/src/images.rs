use inkpage_render_core::WriterError;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// An image XObject already written to the document.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EmbeddedImage {
    pub id: ObjectId,
    pub px_width: u32,
    pub px_height: u32,
}

/// Decodes `data` and writes it as an RGB image XObject, with a soft mask
/// when the source carries transparency.
pub(crate) fn embed_image(
    document: &mut Document,
    src: &str,
    data: &[u8],
) -> Result<EmbeddedImage, WriterError> {
    let invalid = |message: String| WriterError::InvalidImage {
        src: src.to_string(),
        message,
    };
    let decoded = image::load_from_memory(data).map_err(|e| invalid(e.to_string()))?;
    let (px_width, px_height) = (decoded.width(), decoded.height());
    if px_width == 0 || px_height == 0 {
        return Err(invalid("image has no pixels".to_string()));
    }

    let smask = if decoded.color().has_alpha() {
        let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
        let mask = image_stream(px_width, px_height, "DeviceGray", alpha)?;
        Some(document.add_object(mask))
    } else {
        None
    };

    let rgb = decoded.to_rgb8().into_raw();
    let mut stream = image_stream(px_width, px_height, "DeviceRGB", rgb)?;
    if let Some(mask_id) = smask {
        stream.dict.set("SMask", mask_id);
    }
    let id = document.add_object(stream);
    log::debug!("Embedded image '{}' ({}x{} px)", src, px_width, px_height);

    Ok(EmbeddedImage {
        id,
        px_width,
        px_height,
    })
}

fn image_stream(
    width: u32,
    height: u32,
    color_space: &str,
    samples: Vec<u8>,
) -> Result<Stream, WriterError> {
    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => Object::Name(color_space.as_bytes().to_vec()),
            "BitsPerComponent" => 8i64,
        },
        samples,
    );
    stream
        .compress()
        .map_err(|e| WriterError::Pdf(e.to_string()))?;
    Ok(stream)
}
