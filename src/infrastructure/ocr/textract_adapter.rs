use async_trait::async_trait;
use aws_sdk_textract::Client;
use aws_sdk_textract::config::Region;
use aws_sdk_textract::error::DisplayErrorContext;
use aws_sdk_textract::operation::get_document_analysis::GetDocumentAnalysisOutput;
use aws_sdk_textract::primitives::Blob;
use aws_sdk_textract::types::{Block, Document, DocumentLocation, FeatureType, JobStatus, S3Object};

use crate::application::ports::{
    DocumentAnalysisError, DocumentAnalysisService, OcrError, OcrService,
};
use crate::domain::{
    AnalysisFeature, AnalysisPage, BlockType, JobStatus as AnalysisStatus, ObjectLocation,
    RecognizedBlock,
};

/// AWS Textract, used for both the synchronous `AnalyzeDocument` call and
/// the asynchronous `StartDocumentAnalysis` / `GetDocumentAnalysis` pair.
pub struct TextractAdapter {
    client: Client,
}

impl TextractAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS credential chain.
    pub async fn from_region(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }
}

fn feature_types(features: &[AnalysisFeature]) -> Vec<FeatureType> {
    features
        .iter()
        .map(|f| match f {
            AnalysisFeature::Tables => FeatureType::Tables,
            AnalysisFeature::Forms => FeatureType::Forms,
            AnalysisFeature::Layout => FeatureType::Layout,
            AnalysisFeature::Signatures => FeatureType::Signatures,
        })
        .collect()
}

pub fn recognized_blocks(blocks: &[Block]) -> Vec<RecognizedBlock> {
    blocks
        .iter()
        .map(|block| RecognizedBlock {
            block_type: block
                .block_type()
                .map(|t| BlockType::from_tag(t.as_str()))
                .unwrap_or_else(|| BlockType::Other(String::new())),
            text: block.text().map(str::to_string),
        })
        .collect()
}

/// Partial success still carries result pages, so it is read like success.
pub fn analysis_page(
    output: &GetDocumentAnalysisOutput,
) -> Result<AnalysisPage, DocumentAnalysisError> {
    let status = match output.job_status() {
        Some(JobStatus::InProgress) => AnalysisStatus::InProgress,
        Some(JobStatus::Succeeded) | Some(JobStatus::PartialSuccess) => AnalysisStatus::Succeeded,
        Some(JobStatus::Failed) => AnalysisStatus::Failed,
        other => {
            return Err(DocumentAnalysisError::InvalidResponse(format!(
                "unexpected job status: {other:?}"
            )));
        }
    };

    Ok(AnalysisPage {
        status,
        blocks: recognized_blocks(output.blocks()),
        next_token: output.next_token().map(str::to_string),
        status_message: output.status_message().map(str::to_string),
    })
}

#[async_trait]
impl OcrService for TextractAdapter {
    #[tracing::instrument(skip(self, data, features), fields(bytes = data.len()))]
    async fn analyze(
        &self,
        data: &[u8],
        features: &[AnalysisFeature],
    ) -> Result<Vec<RecognizedBlock>, OcrError> {
        let output = self
            .client
            .analyze_document()
            .document(Document::builder().bytes(Blob::new(data.to_vec())).build())
            .set_feature_types(Some(feature_types(features)))
            .send()
            .await
            .map_err(|e| OcrError::RequestFailed(DisplayErrorContext(&e).to_string()))?;

        let blocks = recognized_blocks(output.blocks());
        tracing::info!(blocks = blocks.len(), "Textract analysis complete");
        Ok(blocks)
    }
}

#[async_trait]
impl DocumentAnalysisService for TextractAdapter {
    #[tracing::instrument(skip(self, features), fields(location = %location))]
    async fn start(
        &self,
        location: &ObjectLocation,
        features: &[AnalysisFeature],
    ) -> Result<String, DocumentAnalysisError> {
        let s3_object = S3Object::builder()
            .bucket(&location.bucket)
            .name(&location.key)
            .build();

        let output = self
            .client
            .start_document_analysis()
            .document_location(DocumentLocation::builder().s3_object(s3_object).build())
            .set_feature_types(Some(feature_types(features)))
            .send()
            .await
            .map_err(|e| {
                DocumentAnalysisError::ApiRequestFailed(DisplayErrorContext(&e).to_string())
            })?;

        output.job_id().map(str::to_string).ok_or_else(|| {
            DocumentAnalysisError::InvalidResponse("response carried no job id".to_string())
        })
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_status(
        &self,
        job_id: &str,
        next_token: Option<&str>,
    ) -> Result<AnalysisPage, DocumentAnalysisError> {
        let output = self
            .client
            .get_document_analysis()
            .job_id(job_id)
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                DocumentAnalysisError::ApiRequestFailed(DisplayErrorContext(&e).to_string())
            })?;

        analysis_page(&output)
    }
}
