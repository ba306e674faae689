use std::future::Future;

/// Aggregate outcome of a batch upload. No per-file detail survives
/// beyond the two counters; success + fail always equals the number of
/// files submitted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct UploadReport {
    pub success_count: usize,
    pub fail_count: usize,
}

impl UploadReport {
    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }
}

/// Submits files one at a time, one call per file. A failing upload
/// never aborts the batch or touches later files. After the last file,
/// `resync` runs exactly once to replace the cached file listing.
/// An empty batch is a no-op: no uploads, no resync.
///
/// The payload type is the caller's choice; a file whose bytes never
/// became readable can still occupy a slot, with `upload_one` failing
/// it without a network call, so the counters cover the full selection.
pub async fn upload_batch<F, FFut, R, RFut, P, E>(
    files: Vec<(String, P)>,
    mut upload_one: F,
    resync: R,
) -> UploadReport
where
    F: FnMut(String, P) -> FFut,
    FFut: Future<Output = Result<(), E>>,
    R: FnOnce() -> RFut,
    RFut: Future<Output = ()>,
{
    if files.is_empty() {
        return UploadReport::default();
    }

    let mut report = UploadReport::default();
    for (name, bytes) in files {
        match upload_one(name, bytes).await {
            Ok(()) => report.success_count += 1,
            Err(_) => report.fail_count += 1,
        }
    }

    resync().await;
    report
}
