use aws_sdk_textract::operation::get_document_analysis::GetDocumentAnalysisOutput;
use aws_sdk_textract::types::{Block, BlockType as TextractBlockType, JobStatus as TextractStatus};

use docbridge::application::ports::DocumentAnalysisError;
use docbridge::domain::{BlockType, JobStatus, RecognizedBlock};
use docbridge::infrastructure::ocr::{analysis_page, recognized_blocks};

fn block(block_type: TextractBlockType, text: Option<&str>) -> Block {
    let builder = Block::builder().block_type(block_type);
    match text {
        Some(text) => builder.text(text).build(),
        None => builder.build(),
    }
}

#[test]
fn given_textract_blocks_when_converting_then_type_and_text_are_preserved_in_order() {
    let blocks = vec![
        block(TextractBlockType::Page, None),
        block(TextractBlockType::Line, Some("Invoice 42")),
        block(TextractBlockType::Word, Some("Invoice")),
        block(TextractBlockType::Table, None),
    ];

    let converted = recognized_blocks(&blocks);

    assert_eq!(
        converted,
        vec![
            RecognizedBlock {
                block_type: BlockType::Page,
                text: None
            },
            RecognizedBlock::line("Invoice 42"),
            RecognizedBlock {
                block_type: BlockType::Word,
                text: Some("Invoice".to_string())
            },
            RecognizedBlock {
                block_type: BlockType::Other("TABLE".to_string()),
                text: None
            },
        ]
    );
}

#[test]
fn given_succeeded_output_with_token_when_reading_page_then_cursor_is_kept() {
    let output = GetDocumentAnalysisOutput::builder()
        .job_status(TextractStatus::Succeeded)
        .blocks(block(TextractBlockType::Line, Some("first")))
        .next_token("page-2")
        .build();

    let page = analysis_page(&output).unwrap();

    assert_eq!(page.status, JobStatus::Succeeded);
    assert_eq!(page.next_token.as_deref(), Some("page-2"));
    assert_eq!(page.blocks, vec![RecognizedBlock::line("first")]);
}

#[test]
fn given_partial_success_when_reading_page_then_treated_as_succeeded() {
    let output = GetDocumentAnalysisOutput::builder()
        .job_status(TextractStatus::PartialSuccess)
        .build();

    assert_eq!(analysis_page(&output).unwrap().status, JobStatus::Succeeded);
}

#[test]
fn given_failed_output_when_reading_page_then_status_message_is_carried() {
    let output = GetDocumentAnalysisOutput::builder()
        .job_status(TextractStatus::Failed)
        .status_message("bad scan")
        .build();

    let page = analysis_page(&output).unwrap();

    assert_eq!(page.status, JobStatus::Failed);
    assert_eq!(page.status_message.as_deref(), Some("bad scan"));
}

#[test]
fn given_output_without_status_when_reading_page_then_returns_invalid_response() {
    let output = GetDocumentAnalysisOutput::builder().build();

    assert!(matches!(
        analysis_page(&output),
        Err(DocumentAnalysisError::InvalidResponse(_))
    ));
}
