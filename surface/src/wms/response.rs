use super::Reply;
use crate::SurfaceError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// `GetFeatureInfo` JSON payload, reduced to what is read from it.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Option<Map<String, Value>>,
}

/// Extracts the elevation from a `GetFeatureInfo` reply.
///
/// Returns `Ok(None)` when the service has no data at the point,
/// signalled by an empty feature list.
pub(crate) fn parse_elevation(url: &str, reply: &Reply) -> Result<Option<f64>, SurfaceError> {
    if !(200..300).contains(&reply.status) {
        return Err(SurfaceError::Connectivity {
            url: url.to_owned(),
            reason: format!("HTTP status {}", reply.status),
        });
    }

    let format_err = |reason: String| SurfaceError::Format {
        url: url.to_owned(),
        reason,
    };

    let collection: FeatureCollection =
        serde_json::from_slice(&reply.body).map_err(|e| format_err(e.to_string()))?;
    let features = collection
        .features
        .ok_or_else(|| format_err("missing 'features'".to_owned()))?;
    let Some(feature) = features.into_iter().next() else {
        return Ok(None);
    };
    let properties = feature
        .properties
        .filter(|properties| !properties.is_empty())
        .ok_or_else(|| format_err("first feature has no properties".to_owned()))?;

    match properties.get("value_list") {
        Some(Value::Number(number)) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| format_err(format!("'value_list' {number} is not a float"))),
        Some(Value::String(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format_err(format!("'value_list' '{text}' is not a number"))),
        Some(other) => Err(format_err(format!("'value_list' {other} is not a number"))),
        None => Err(format_err("missing 'value_list'".to_owned())),
    }
}
