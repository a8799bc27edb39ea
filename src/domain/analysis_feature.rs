/// Feature set requested from the document-analysis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisFeature {
    Tables,
    Forms,
    Layout,
    Signatures,
}

/// Both OCR paths always ask for every feature.
pub const ANALYSIS_FEATURES: [AnalysisFeature; 4] = [
    AnalysisFeature::Tables,
    AnalysisFeature::Forms,
    AnalysisFeature::Layout,
    AnalysisFeature::Signatures,
];

impl AnalysisFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tables => "TABLES",
            Self::Forms => "FORMS",
            Self::Layout => "LAYOUT",
            Self::Signatures => "SIGNATURES",
        }
    }
}
