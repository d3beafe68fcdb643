//! Single-image GeoTIFF decoding.
//!
//! Only the two common georeferencing forms are understood: a
//! pixel-scale + tie-point pair, or a full model transformation
//! matrix. GeoKeys (CRS, raster-is-point) are ignored.

use crate::{sample_count, Affine, Band, RasterError, C};
use num_traits::AsPrimitive;
use std::{
    io::{Read, Seek},
    path::PathBuf,
};
use tiff::{
    decoder::{Decoder, DecodingResult},
    tags::Tag,
};

pub(crate) fn decode<R: Read + Seek>(
    reader: R,
    origin: PathBuf,
) -> Result<(Affine, Vec<Band>), RasterError> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let (cols, rows) = (width as usize, height as usize);
    let transform = georeference(&mut decoder)?.ok_or(RasterError::Georeference(origin))?;

    let samples_per_pixel = decoder
        .find_tag(Tag::SamplesPerPixel)?
        .map(tiff::decoder::ifd::Value::into_u32)
        .transpose()?
        .map_or(1, |n| n as usize);

    let expected = sample_count(rows, cols, samples_per_pixel)?;
    let interleaved = widen(decoder.read_image()?);
    if interleaved.len() != expected {
        return Err(RasterError::BandLen {
            rows,
            cols,
            expected,
            actual: interleaved.len(),
        });
    }

    let bands = (0..samples_per_pixel)
        .map(|band| {
            let samples = interleaved
                .iter()
                .skip(band)
                .step_by(samples_per_pixel)
                .copied()
                .collect();
            Band::new(rows, cols, samples)
        })
        .collect::<Result<Vec<Band>, RasterError>>()?;

    Ok((transform, bands))
}

fn georeference<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<Affine>, RasterError> {
    if let Some(matrix) = optional_f64_vec(decoder, Tag::ModelTransformationTag)? {
        if matrix.len() >= 8 {
            let transform = Affine::new(
                matrix[0], matrix[1], matrix[3], matrix[4], matrix[5], matrix[7],
            )?;
            return Ok(Some(transform));
        }
    }

    let scale = optional_f64_vec(decoder, Tag::ModelPixelScaleTag)?;
    let tiepoint = optional_f64_vec(decoder, Tag::ModelTiepointTag)?;
    match (scale, tiepoint) {
        (Some(scale), Some(tiepoint)) if scale.len() >= 2 && tiepoint.len() >= 6 => {
            let (sx, sy) = (scale[0], scale[1]);
            let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
            Ok(Some(Affine::from_origin(x - i * sx, y + j * sy, sx, sy)?))
        }
        _ => Ok(None),
    }
}

fn optional_f64_vec<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    tag: Tag,
) -> Result<Option<Vec<C>>, RasterError> {
    match decoder.find_tag(tag)? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

fn widen(image: DecodingResult) -> Vec<C> {
    fn cast<T: AsPrimitive<C>>(samples: Vec<T>) -> Vec<C> {
        samples.into_iter().map(AsPrimitive::as_).collect()
    }

    match image {
        DecodingResult::U8(samples) => cast(samples),
        DecodingResult::U16(samples) => cast(samples),
        DecodingResult::U32(samples) => cast(samples),
        DecodingResult::U64(samples) => cast(samples),
        DecodingResult::I8(samples) => cast(samples),
        DecodingResult::I16(samples) => cast(samples),
        DecodingResult::I32(samples) => cast(samples),
        DecodingResult::I64(samples) => cast(samples),
        DecodingResult::F32(samples) => cast(samples),
        DecodingResult::F64(samples) => samples,
    }
}
