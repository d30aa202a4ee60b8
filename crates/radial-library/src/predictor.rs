//! Hydroacoustic travel-time predictions from a model library.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geodesy::EarthShape;
use radial_model::{Interpolation, Phase};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::library::RadialModelLibrary;

/// A source-receiver pair to predict for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Receiving station name.
    pub station: String,
    /// Origin time, selects the season.
    pub time: DateTime<Utc>,
    /// Source latitude in degrees.
    pub source_lat: f64,
    /// Source longitude in degrees.
    pub source_lon: f64,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RayType {
    HydroacousticWave,
    /// Neither the direct nor the antipodal path reaches the station.
    Blocked,
    /// No model for the station and season.
    Unsupported,
}

/// Outcome of one [`PredictionRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub station: String,
    pub phase: Phase,
    pub ray_type: RayType,
    /// Grid file the prediction came from.
    pub model: Option<String>,
    pub season: Option<String>,
    /// Interpolated values; the uncertainty includes the T-phase bias.
    pub values: Option<Interpolation>,
    /// Why there are no values.
    pub message: Option<String>,
}

impl Prediction {
    fn failed(request: &PredictionRequest, ray_type: RayType, message: String) -> Self {
        Self {
            station: request.station.clone(),
            phase: request.phase,
            ray_type,
            model: None,
            season: None,
            values: None,
            message: Some(message),
        }
    }

    pub fn travel_time(&self) -> Option<f64> {
        self.values.and_then(|v| v.travel_time)
    }

    pub fn uncertainty(&self) -> Option<f64> {
        self.values.and_then(|v| v.uncertainty)
    }
}

/// Predicts T and H phase travel times from a [`RadialModelLibrary`].
#[derive(Debug, Clone)]
pub struct HydroPredictor {
    library: Arc<RadialModelLibrary>,
}

impl HydroPredictor {
    pub fn new(library: Arc<RadialModelLibrary>) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &Arc<RadialModelLibrary> {
        &self.library
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let Some(model) = self.library.resolve(request.time, &request.station)? else {
            debug!(station = %request.station, time = %request.time, "No radial model");
            return Ok(Prediction::failed(
                request,
                RayType::Unsupported,
                format!(
                    "station {} is not supported by library {}",
                    request.station,
                    self.library.root().display()
                ),
            ));
        };

        let source = EarthShape::Wgs84.vector_degrees(request.source_lat, request.source_lon);
        let values = model.interpolate_for_phase(&source, request.phase);
        if values.blocked {
            let mut prediction = Prediction::failed(
                request,
                RayType::Blocked,
                format!(
                    "ray path is blocked: {} to ({}, {})",
                    request.station, request.source_lat, request.source_lon
                ),
            );
            prediction.model = Some(model.name());
            prediction.season = Some(model.season());
            prediction.values = Some(values);
            return Ok(prediction);
        }

        Ok(Prediction {
            station: request.station.clone(),
            phase: request.phase,
            ray_type: RayType::HydroacousticWave,
            model: Some(model.name()),
            season: Some(model.season()),
            values: Some(values),
            message: None,
        })
    }

    /// Travel time uncertainty for `request`, with the T-phase bias.
    ///
    /// `None` when there is no model or the path is blocked.
    pub fn uncertainty(&self, request: &PredictionRequest) -> Result<Option<f64>> {
        Ok(self.predict(request)?.uncertainty())
    }

    /// Only H phases are predicted directly, and only with a model on hand.
    pub fn is_supported(&self, station: &str, phase: Phase, time: DateTime<Utc>) -> Result<bool> {
        Ok(phase == Phase::H && self.library.resolve(time, station)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use radial_model::ModelConfig;
    use test_utils::{assert_close, four_spoke_grid, GridBuilder, LibraryFixture, SpokeSpec};

    fn fixture() -> LibraryFixture {
        let fixture = LibraryFixture::new();
        fixture.write_stations("stations.txt", &["AAA", "BLK", "NONE"]);
        fixture.write_time_guide("time_guide.txt", 1.5, &[("ALL", None)]);
        fixture.write_model("ALL", "AAA", &four_spoke_grid());
        let blocked = GridBuilder::new(0.0, 0.0, "")
            .spokes((0..4).map(|k| SpokeSpec::linear(90.0 * k as f32, 10.0, 1, 700.0, 2.0)));
        fixture.write_model("ALL", "BLK", &blocked);
        fixture
    }

    fn request(station: &str, lon: f64, phase: Phase) -> PredictionRequest {
        PredictionRequest {
            station: station.to_string(),
            time: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            source_lat: 0.0,
            source_lon: lon,
            phase,
        }
    }

    #[test]
    fn test_predict_hydroacoustic() {
        let fixture = fixture();
        let library = RadialModelLibrary::open(fixture.root(), &ModelConfig::default()).unwrap();
        let predictor = HydroPredictor::new(library.clone());

        let h = predictor.predict(&request("AAA", 1.5, Phase::H)).unwrap();
        assert_eq!(h.ray_type, RayType::HydroacousticWave);
        assert_eq!(h.model.as_deref(), Some("AAA"));
        assert_eq!(h.season.as_deref(), Some("ALL"));
        assert!(h.message.is_none());
        // between 15 on the north spoke and 16 on the east spoke
        assert_close!(h.travel_time().unwrap(), 16.0, 1e-6);
        assert_close!(h.uncertainty().unwrap(), 1.0, 1e-6);

        let t = predictor.uncertainty(&request("AAA", 1.5, Phase::T));
        assert_close!(t.unwrap().unwrap(), 2.5, 1e-6);
        library.close();
    }

    #[test]
    fn test_predict_blocked_and_unsupported() {
        let fixture = fixture();
        let library = RadialModelLibrary::open(fixture.root(), &ModelConfig::default()).unwrap();
        let predictor = HydroPredictor::new(library.clone());

        let blocked = predictor.predict(&request("BLK", 170.0, Phase::H)).unwrap();
        assert_eq!(blocked.ray_type, RayType::Blocked);
        assert!(blocked.message.as_ref().unwrap().contains("blocked"));
        assert_eq!(blocked.travel_time(), None);
        assert_eq!(predictor.uncertainty(&request("BLK", 170.0, Phase::T)).unwrap(), None);

        let missing = predictor.predict(&request("NONE", 1.0, Phase::H)).unwrap();
        assert_eq!(missing.ray_type, RayType::Unsupported);
        assert!(missing.message.unwrap().contains("NONE"));
        assert!(missing.values.is_none());
        library.close();
    }

    #[test]
    fn test_is_supported() {
        let fixture = fixture();
        let library = RadialModelLibrary::open(fixture.root(), &ModelConfig::default()).unwrap();
        let predictor = HydroPredictor::new(library.clone());
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        assert!(predictor.is_supported("AAA", Phase::H, time).unwrap());
        assert!(!predictor.is_supported("AAA", Phase::T, time).unwrap());
        assert!(!predictor.is_supported("NONE", Phase::H, time).unwrap());
        library.close();
    }

    #[test]
    fn test_prediction_serializes() {
        let fixture = fixture();
        let library = RadialModelLibrary::open(fixture.root(), &ModelConfig::default()).unwrap();
        let prediction = HydroPredictor::new(library.clone())
            .predict(&request("AAA", 1.5, Phase::H))
            .unwrap();

        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["ray_type"], "hydroacoustic_wave");
        assert_eq!(json["phase"], "H");
        assert_eq!(json["values"]["blocked"], false);
        library.close();
    }
}
