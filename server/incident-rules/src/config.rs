//! Engine configuration with sane defaults.

/// Tunable thresholds for validation and classification.
#[derive(Debug, Clone)]
pub struct Config {
  /// Oldest admissible incident date, in months before now.
  pub look_back_months: u32,
  /// How recent an involved employee's safety training must be for PPE
  /// incidents, in months.
  pub training_recency_months: u32,
  /// Estimated cost above which manager approval is forced.
  pub approval_cost_threshold: u32,
  /// Estimated cost above which safety review is forced. Also the cost leg
  /// of the high-risk query.
  pub review_cost_threshold: u32,
  /// Max characters for the location field.
  pub max_location_len: usize,
  /// Max characters for description and investigation notes.
  pub max_description_len: usize,
  /// Max characters for corrective action and witnesses.
  pub max_note_len: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      look_back_months: 12,
      training_recency_months: 6,
      approval_cost_threshold: 5_000,
      review_cost_threshold: 10_000,
      max_location_len: 200,
      max_description_len: 1_000,
      max_note_len: 500,
    }
  }
}
