// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data and infra layers into the workflows
// the CLI exposes. No matrix math and no printing here — only
// workflow coordination and error context.
//
//   prepare_use_case — fit / load the vocabulary, report corpus stats
//   batch_use_case   — stream a number of batches through the pipeline
//   plot_use_case    — draw curves stored in a CSV file

// Vocabulary preparation and corpus statistics
pub mod prepare_use_case;

// Batch streaming
pub mod batch_use_case;

// Figure drawing
pub mod plot_use_case;
