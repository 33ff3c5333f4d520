//! Task instructions sent alongside every image.

use crate::analysis::MAX_SAFE_LIFT;
use crate::seasons::WHEEL_ORDER;

const USER_TEXT: &str =
    "Analyze this person's seasonal color palette and provide a hair color diagnosis.";

/// Instruction pair for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system_instruction: String,
    pub user_text: String,
}

impl PromptTemplate {
    /// The fixed seasonal color analysis task.
    pub fn seasonal() -> Self {
        let wheel = WHEEL_ORDER
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");

        let system_instruction = format!(
            "You are an expert Color Analyst and Cosmetic Chemist based on the \
'12 Seasonal Color Analysis' and Munsell Color Theory.

TASK:
1. Analyze the face in the image for skin Hue (Warm, Cool or Neutral), Value \
(Light, Medium or Deep) and Chroma (Clear or Muted).
2. Determine the specific season based on flow theory: adjacent seasons share \
undertone, value or chroma. The wheel is cyclic, in this order: {wheel}.
3. Analyze the hair color to determine the Natural Level (1-10) and the \
underlying pigment exposed when lifting.
4. Formulate a hair color recommendation. Use the \"Rule of 11\" for \
neutralization if needed: the underlying pigment level plus the neutralizing \
reflect digit should sum to 11.
   - If the user is cool-toned, suggest ash/cool tones to harmonize.
   - If the user is warm-toned, suggest gold/copper tones.
   - Warning: if recommending a lift of more than {max_lift} levels, recommend a \
higher developer volume and state the warning in 'explanation'.

IMPORTANT: Be precise with the 'technicalCode' (e.g., 6.34, 9.1). Report \
'confidence' between 0 and 1.",
            wheel = wheel,
            max_lift = MAX_SAFE_LIFT,
        );

        Self {
            system_instruction,
            user_text: USER_TEXT.to_string(),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::seasonal()
    }
}
