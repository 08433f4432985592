//! System prompts for the vision-LLM analyser.
//!
//! One prompt per [`DocType`]. The mock endpoint never reads these; they are
//! what [`crate::pipeline::analyze::LlmAnalyzer`] sends so that a real model
//! produces markdown of the same shape as the canned texts.

use crate::doc_type::DocType;

/// Rules shared by every doc-type prompt.
pub const OUTPUT_RULES: &str = r#"OUTPUT FORMAT
- Output ONLY Markdown
- Do NOT wrap the answer in ```markdown fences
- Do NOT add commentary about being an AI or about the image quality
- Start with a level-2 heading (##)"#;

/// Task instructions for a doc type, without the shared output rules.
pub fn task_instructions(doc_type: DocType) -> &'static str {
    match doc_type {
        DocType::RawText => {
            "Extract all readable text from this page in reading order. \
             Use headings and bullet lists where the page uses them. \
             Finish with a short '## Key Findings' section."
        }
        DocType::ArabicTranslate => {
            "Read the text on this page and translate it into Modern Standard Arabic. \
             Keep the document's structure (headings, lists). Write the headings in Arabic too."
        }
        DocType::Summary => {
            "Summarise this page. Give a '## Document Summary' heading, \
             a '### Main Topics' numbered list and a '### Key Findings' paragraph."
        }
        DocType::Research => {
            "Analyse this page as part of a research paper. Report title, authors and \
             publication when visible, then sections for abstract summary, methodology, \
             key findings and citations."
        }
        DocType::DataFields => {
            "Extract the general data fields on this page (document type, dates, names, \
             departments, identifiers) as a two-column Markdown table of Field and Value, \
             followed by any additional information."
        }
        DocType::Invoice => {
            "Analyse this page as an invoice. Report invoice number, dates, billing parties, \
             each line item with its amount, subtotal, tax and total due."
        }
        DocType::Contract => {
            "Analyse this page as a contract. Report contract type, effective date, term, \
             key provisions (services, payment terms, termination, confidentiality) and \
             notable clauses."
        }
        DocType::Certificate => {
            "Analyse this page as a certificate. Report certificate type, recipient, issuer, \
             issue date, validity, certified areas, certificate number and signing authority."
        }
        DocType::Official => {
            "Analyse this page as an official or government document. Report document type, \
             issuing authority, reference number, date of issue, the notices it contains and \
             any authentication features (seals, signatures, watermarks)."
        }
    }
}

/// Full system prompt for `doc_type`.
pub fn system_prompt(doc_type: DocType) -> String {
    format!(
        "You are a document analyst looking at a single rendered PDF page.\n\n\
         TASK\n{}\n\n{}",
        task_instructions(doc_type),
        OUTPUT_RULES
    )
}
