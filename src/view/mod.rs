//! Presentation layer.
//!
//! [`render`] is a pure projection of the session state. The report is the
//! only place where a provider result meets the season knowledge base.

pub mod terminal;

use crate::analysis::{AnalysisResult, HairDiagnosis, SkinAnalysis, TechnicalCode, MAX_SAFE_LIFT};
use crate::seasons::{ColorSwatch, SeasonEntry, SeasonId};
use crate::session::SessionState;
use serde::Serialize;

pub const UPLOAD_TITLE: &str = "Sube tu Selfie";
pub const UPLOAD_SUBTITLE: &str = "Sin maquillaje, luz natural frontal";
pub const UPLOAD_HINT: &str = "select <ruta>  para iniciar el análisis";
pub const LOADING_TITLE: &str = "Analizando Biometría Cromática";
pub const LOADING_MESSAGE: &str =
    "Calculando variables Munsell (Matiz, Valor, Croma) y determinando pigmentos subyacentes...";

/// What the user sees. Exactly one view exists per state.
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum View<'a> {
    UploadPrompt {
        error: Option<&'a str>,
    },
    Loading {
        title: &'static str,
        message: &'static str,
    },
    Report(Report<'a>),
}

/// A result joined with its season entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub season: &'static SeasonEntry,
    pub confidence_percent: u8,
    pub reasoning: &'a str,
    pub skin: &'a SkinAnalysis,
    pub hair: &'a HairDiagnosis,
    /// `None` when the code cannot be read as depth plus reflect digits.
    pub technical_code: Option<TechnicalCode>,
    pub reflects: Option<String>,
    pub lift_levels: Option<i16>,
    pub lift_warning: Option<String>,
    /// Adjacent seasons on the wheel.
    pub neighbors: [SeasonId; 2],
}

impl<'a> Report<'a> {
    pub fn new(result: &'a AnalysisResult) -> Self {
        let season = result.season_id.entry();
        let hair = &result.hair_diagnosis;
        let technical_code = hair.technical_code();
        let reflects = technical_code
            .as_ref()
            .filter(|code| !code.reflects.is_empty())
            .map(TechnicalCode::reflect_names);
        let lift_levels = hair.lift_levels();
        let lift_warning = lift_levels
            .filter(|_| hair.exceeds_safe_lift())
            .map(|lift| {
                format!(
                    "Aclarar {} niveles supera el límite seguro de {}: usar un revelador de mayor volumen y vigilar la fibra.",
                    lift, MAX_SAFE_LIFT
                )
            });
        let (previous, next) = result.season_id.neighbors();

        Self {
            season,
            confidence_percent: result.confidence_percent(),
            reasoning: &result.reasoning,
            skin: &result.skin_analysis,
            hair,
            technical_code,
            reflects,
            lift_levels,
            lift_warning,
            neighbors: [previous, next],
        }
    }

    pub fn palette(&self) -> &'static [ColorSwatch] {
        self.season.palette
    }
}

/// Projects the state into its view.
pub fn render(state: &SessionState) -> View<'_> {
    match state {
        SessionState::Idle { error } => View::UploadPrompt {
            error: error.as_ref().map(|failure| failure.message.as_str()),
        },
        SessionState::Analyzing { .. } => View::Loading {
            title: LOADING_TITLE,
            message: LOADING_MESSAGE,
        },
        SessionState::Displaying { result, .. } => View::Report(Report::new(result)),
    }
}
