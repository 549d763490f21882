use super::model::UploadDataset;

/// Files with fewer uploads than this are skipped rather than plotted.
pub const MIN_RECORDS: usize = 30;

/// Whether a dataset has enough uploads to be worth a plot.
pub fn should_plot(dataset: &UploadDataset) -> bool {
    dataset.len() >= MIN_RECORDS
}
