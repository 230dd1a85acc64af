//! The ordered transcription steps a sheet moves through, from the raw
//! picture up to the connected page. Ordering matters: "ensure step reached"
//! compares stages, and the help footer lists them in processing order.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Load,
    Binary,
    Scale,
    Grid,
    Headers,
    StemSeeds,
    Beams,
    Ledgers,
    Heads,
    Stems,
    Reduction,
    CueBeams,
    Texts,
    Measures,
    Chords,
    Curves,
    Symbols,
    Links,
    Rhythms,
    Page,
}

impl Step {
    /// All steps in processing order.
    pub fn all() -> &'static [Step] {
        use Step::*;
        &[
            Load, Binary, Scale, Grid, Headers, StemSeeds, Beams, Ledgers, Heads, Stems,
            Reduction, CueBeams, Texts, Measures, Chords, Curves, Symbols, Links, Rhythms, Page,
        ]
    }

    /// One-line description, shown in the CLI help footer.
    pub fn description(self) -> &'static str {
        match self {
            Step::Load => "Load the sheet gray picture",
            Step::Binary => "Binarize the sheet picture",
            Step::Scale => "Compute line thickness, interline, beam thickness",
            Step::Grid => "Retrieve staff lines, barlines, systems & parts",
            Step::Headers => "Retrieve clef/key/time system headers",
            Step::StemSeeds => "Retrieve stem thickness & seeds for stems",
            Step::Beams => "Retrieve beams",
            Step::Ledgers => "Retrieve ledgers",
            Step::Heads => "Retrieve note heads & whole notes",
            Step::Stems => "Build stems connected to heads & beams",
            Step::Reduction => "Reduce conflicts in heads, stems & beams",
            Step::CueBeams => "Retrieve cue beams",
            Step::Texts => "Retrieve text lines & words",
            Step::Measures => "Retrieve raw measures from barline groups",
            Step::Chords => "Gather note heads into chords",
            Step::Curves => "Retrieve slurs, wedges & endings",
            Step::Symbols => "Retrieve fixed-shape symbols",
            Step::Links => "Link and reduce symbols",
            Step::Rhythms => "Handle rhythms within measures",
            Step::Page => "Connect systems within page",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Stable lowercase names, matching the CLI value strings.
        let s = self
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        write!(f, "{}", s)
    }
}

/// Help footer listing every step in order with its description.
pub fn help_footer() -> String {
    let mut out = String::from("Sheet steps are in order:\n");
    for step in Step::all() {
        out.push_str(&format!("  {:<12} {}\n", step.to_string(), step.description()));
    }
    out
}
