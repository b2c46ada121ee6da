// Convert interactor - Orchestrates the fetch and transcode use case

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::adapters::ChannelProgressAdapter;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::SourceClassifier;
use crate::planner::CommandBuilder;
use crate::ports::*;
use crate::utils::path::PathUtils;
use crate::utils::workspace::{with_workspace, WORKSPACE_PREFIX};

/// Pipeline stage an error was raised in; selects the outcome message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Download,
    Conversion,
}

#[derive(Debug)]
struct StageFailure {
    stage: Stage,
    error: DomainError,
}

impl StageFailure {
    fn download(error: DomainError) -> Self {
        Self {
            stage: Stage::Download,
            error,
        }
    }

    fn conversion(error: DomainError) -> Self {
        Self {
            stage: Stage::Conversion,
            error,
        }
    }

    fn into_outcome(self) -> ConversionOutcome {
        let message = match self.stage {
            Stage::Download => format!("Download failed: {}", self.error),
            Stage::Conversion => format!("Conversion failed: {}", self.error),
        };
        ConversionOutcome::failure(message, &self.error)
    }
}

/// Interactor for the convert use case
pub struct ConvertInteractor {
    direct_fetch: Arc<dyn DirectFetchPort>,
    delegated_fetch: Arc<dyn DelegatedFetchPort>,
    transcode: Arc<dyn TranscodePort>,
    command_builder: CommandBuilder,
    workspace_root: Option<PathBuf>,
    in_flight: Mutex<()>,
}

impl ConvertInteractor {
    /// Create new convert interactor with injected ports
    pub fn new(
        direct_fetch: Arc<dyn DirectFetchPort>,
        delegated_fetch: Arc<dyn DelegatedFetchPort>,
        transcode: Arc<dyn TranscodePort>,
        command_builder: CommandBuilder,
    ) -> Self {
        Self {
            direct_fetch,
            delegated_fetch,
            transcode,
            command_builder,
            workspace_root: None,
            in_flight: Mutex::new(()),
        }
    }

    /// Allocate download workspaces under `root` instead of the system temp dir
    pub fn with_workspace_root(mut self, root: Option<PathBuf>) -> Self {
        self.workspace_root = root;
        self
    }

    /// Run one conversion to completion. Failures come back as an
    /// unsuccessful outcome with a single user-facing message.
    pub async fn execute(
        &self,
        request: ConversionRequest,
        progress: &dyn ProgressPort,
    ) -> ConversionOutcome {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Rejected overlapping conversion");
                return StageFailure::conversion(DomainError::Busy).into_outcome();
            }
        };

        let result = match request.source() {
            MediaSource::Local(path) => self.convert_local(path, &request, progress).await,
            MediaSource::Remote(url) => self.convert_remote(url, &request, progress).await,
        };

        match result {
            Ok(output_path) => {
                info!(output = %output_path.display(), "Conversion pipeline completed");
                ConversionOutcome::success(output_path)
            }
            Err(failure) => {
                warn!(
                    error_kind = failure.error.kind(),
                    stage = ?failure.stage,
                    "Conversion pipeline failed"
                );
                failure.into_outcome()
            }
        }
    }

    /// Run the conversion on its own task, streaming progress over a channel
    pub fn spawn(
        self: &Arc<Self>,
        request: ConversionRequest,
    ) -> (JoinHandle<ConversionOutcome>, UnboundedReceiver<ProgressEvent>) {
        let (sink, rx) = ChannelProgressAdapter::channel();
        let interactor = Arc::clone(self);
        let handle = tokio::spawn(async move { interactor.execute(request, &sink).await });
        (handle, rx)
    }

    async fn convert_local(
        &self,
        input: &Path,
        request: &ConversionRequest,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, StageFailure> {
        if !PathUtils::is_existing_file(input) {
            return Err(StageFailure::conversion(DomainError::Validation(format!(
                "Input file does not exist: {}",
                input.display()
            ))));
        }
        self.transcode_file(input, request, progress).await
    }

    async fn convert_remote(
        &self,
        url: &str,
        request: &ConversionRequest,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, StageFailure> {
        let staged = with_workspace(
            WORKSPACE_PREFIX,
            self.workspace_root.as_deref(),
            |workspace| async move {
                Ok(self.fetch_and_transcode(url, &workspace, request, progress).await)
            },
        )
        .await;
        progress.note("Temporary download files cleaned up.");

        match staged {
            Ok(result) => result,
            Err(e) => Err(StageFailure::download(e)),
        }
    }

    async fn fetch_and_transcode(
        &self,
        url: &str,
        workspace: &Path,
        request: &ConversionRequest,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, StageFailure> {
        let kind = request.media_kind();
        let download_dir = workspace.join(kind.as_str());
        tokio::fs::create_dir_all(&download_dir)
            .await
            .map_err(|e| StageFailure::download(DomainError::directory(&download_dir, &e)))?;
        progress.note(&format!("Created download subfolder: {}", download_dir.display()));

        let strategy = SourceClassifier::classify(url);
        info!(%url, %strategy, kind = kind.as_str(), "Fetching remote source");

        let downloaded = match strategy {
            FetchStrategy::DirectImage => {
                progress.note(&format!("Attempting direct image download for {}", url));
                self.direct_fetch
                    .fetch_direct(url, &download_dir, progress)
                    .await
            }
            FetchStrategy::Delegated => {
                progress.note(&format!("Attempting yt-dlp download for {}", url));
                self.delegated_fetch
                    .fetch_delegated(url, &download_dir, kind, progress)
                    .await
            }
        }
        .map_err(StageFailure::download)?;

        progress.note(&format!(
            "Download complete. Converting {}",
            downloaded.display()
        ));
        self.transcode_file(&downloaded, request, progress).await
    }

    async fn transcode_file(
        &self,
        input: &Path,
        request: &ConversionRequest,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, StageFailure> {
        let plan = self.command_builder.build(input, request);
        self.transcode
            .invoke(&plan, progress)
            .await
            .map_err(StageFailure::conversion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingProgressAdapter;
    use crate::planner::TranscodePlan;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeFetch {
        fail_with: Option<DomainError>,
        seen_dirs: StdMutex<Vec<PathBuf>>,
    }

    impl FakeFetch {
        fn failing(error: DomainError) -> Self {
            Self {
                fail_with: Some(error),
                ..Self::default()
            }
        }

        fn land(&self, dest_dir: &Path, name: &str) -> Result<PathBuf, DomainError> {
            self.seen_dirs.lock().unwrap().push(dest_dir.to_path_buf());
            if let Some(error) = &self.fail_with {
                return Err(error.clone());
            }
            let path = dest_dir.join(name);
            std::fs::write(&path, b"payload").unwrap();
            Ok(path)
        }
    }

    #[async_trait]
    impl DirectFetchPort for FakeFetch {
        async fn fetch_direct(
            &self,
            _url: &str,
            dest_dir: &Path,
            _progress: &dyn ProgressPort,
        ) -> Result<PathBuf, DomainError> {
            self.land(dest_dir, "cat.png")
        }
    }

    #[async_trait]
    impl DelegatedFetchPort for FakeFetch {
        async fn fetch_delegated(
            &self,
            _url: &str,
            dest_dir: &Path,
            _kind: MediaKind,
            _progress: &dyn ProgressPort,
        ) -> Result<PathBuf, DomainError> {
            self.land(dest_dir, "Some_Title.webm")
        }
    }

    #[derive(Default)]
    struct FakeTranscode {
        plans: StdMutex<Vec<TranscodePlan>>,
        fail_with: Option<DomainError>,
    }

    #[async_trait]
    impl TranscodePort for FakeTranscode {
        async fn invoke(
            &self,
            plan: &TranscodePlan,
            _progress: &dyn ProgressPort,
        ) -> Result<PathBuf, DomainError> {
            assert!(plan.input_path.exists(), "input must exist while transcoding");
            self.plans.lock().unwrap().push(plan.clone());
            match &self.fail_with {
                Some(error) => Err(error.clone()),
                None => Ok(plan.output_path.clone()),
            }
        }
    }

    struct Harness {
        direct: Arc<FakeFetch>,
        delegated: Arc<FakeFetch>,
        transcode: Arc<FakeTranscode>,
        interactor: ConvertInteractor,
        root: TempDir,
    }

    fn harness(direct: FakeFetch, delegated: FakeFetch, transcode: FakeTranscode) -> Harness {
        let direct = Arc::new(direct);
        let delegated = Arc::new(delegated);
        let transcode = Arc::new(transcode);
        let root = TempDir::new().unwrap();
        let interactor = ConvertInteractor::new(
            Arc::clone(&direct) as Arc<dyn DirectFetchPort>,
            Arc::clone(&delegated) as Arc<dyn DelegatedFetchPort>,
            Arc::clone(&transcode) as Arc<dyn TranscodePort>,
            CommandBuilder::new(),
        )
        .with_workspace_root(Some(root.path().to_path_buf()));
        Harness {
            direct,
            delegated,
            transcode,
            interactor,
            root,
        }
    }

    fn remote(url: &str, kind: MediaKind, format: &str) -> ConversionRequest {
        ConversionRequest::builder(
            MediaSource::Remote(url.to_string()),
            kind,
            PathBuf::from("/out"),
            format,
        )
        .build()
        .unwrap()
    }

    #[tokio::test]
    async fn test_direct_image_lands_in_kind_subfolder() {
        let h = harness(FakeFetch::default(), FakeFetch::default(), FakeTranscode::default());
        let progress = RecordingProgressAdapter::new();

        let outcome = h
            .interactor
            .execute(remote("https://x.test/cat.png", MediaKind::Image, "jpg"), &progress)
            .await;

        assert!(outcome.ok, "{}", outcome.message);
        assert_eq!(outcome.output_path, Some(PathBuf::from("/out/cat.jpg")));
        let dirs = h.direct.seen_dirs.lock().unwrap().clone();
        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].ends_with("image"));
        assert!(h.delegated.seen_dirs.lock().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(h.root.path()).unwrap().count(), 0);

        let notes = progress.notes();
        assert!(notes.iter().any(|n| n.starts_with("Attempting direct image download")));
        assert_eq!(notes.last().unwrap(), "Temporary download files cleaned up.");
    }

    #[tokio::test]
    async fn test_page_url_is_delegated() {
        let h = harness(FakeFetch::default(), FakeFetch::default(), FakeTranscode::default());
        let progress = RecordingProgressAdapter::new();

        let outcome = h
            .interactor
            .execute(
                remote("https://video.test/watch?v=abc", MediaKind::Video, "mp4"),
                &progress,
            )
            .await;

        assert!(outcome.ok);
        assert_eq!(outcome.output_path, Some(PathBuf::from("/out/Some_Title.mp4")));
        let dirs = h.delegated.seen_dirs.lock().unwrap().clone();
        assert!(dirs[0].ends_with("video"));
        assert!(h.direct.seen_dirs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_transcode_and_cleans_up() {
        let error = DomainError::PathResolution {
            message: "Could not determine downloaded file path from yt-dlp output".to_string(),
            output: "[download] 100%".to_string(),
        };
        let h = harness(FakeFetch::default(), FakeFetch::failing(error), FakeTranscode::default());
        let progress = RecordingProgressAdapter::new();

        let outcome = h
            .interactor
            .execute(remote("https://video.test/watch", MediaKind::Audio, "mp3"), &progress)
            .await;

        assert!(!outcome.ok);
        assert!(outcome.message.starts_with("Download failed:"));
        assert_eq!(outcome.error_kind.as_deref(), Some("path_resolution"));
        assert!(h.transcode.plans.lock().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(h.root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_transcode_failure_is_reported_as_conversion_failure() {
        let transcode = FakeTranscode {
            fail_with: Some(DomainError::ToolNotFound {
                tool: "ffmpeg".to_string(),
            }),
            ..FakeTranscode::default()
        };
        let h = harness(FakeFetch::default(), FakeFetch::default(), transcode);
        let progress = RecordingProgressAdapter::new();

        let outcome = h
            .interactor
            .execute(remote("https://x.test/cat.png", MediaKind::Image, "webp"), &progress)
            .await;

        assert!(!outcome.ok);
        assert!(outcome.message.starts_with("Conversion failed:"));
        assert_eq!(outcome.error_kind.as_deref(), Some("tool_not_found"));
        assert_eq!(std::fs::read_dir(h.root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_local_source_uses_no_workspace() {
        let h = harness(FakeFetch::default(), FakeFetch::default(), FakeTranscode::default());
        let input_dir = TempDir::new().unwrap();
        let input = input_dir.path().join("photo.HEIC");
        std::fs::write(&input, b"heic").unwrap();
        let request = ConversionRequest::builder(
            MediaSource::Local(input.clone()),
            MediaKind::Image,
            PathBuf::from("/out"),
            "jpg",
        )
        .image_quality(80)
        .build()
        .unwrap();

        let outcome = h
            .interactor
            .execute(request, &RecordingProgressAdapter::new())
            .await;

        assert!(outcome.ok);
        let plans = h.transcode.plans.lock().unwrap().clone();
        assert_eq!(plans[0].input_path, input);
        assert!(plans[0].args.windows(2).any(|w| w[0] == "-q:v" && w[1] == "7"));
        assert_eq!(std::fs::read_dir(h.root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_local_input_is_rejected() {
        let h = harness(FakeFetch::default(), FakeFetch::default(), FakeTranscode::default());
        let request = ConversionRequest::builder(
            MediaSource::Local(PathBuf::from("/definitely/not/here.mov")),
            MediaKind::Video,
            PathBuf::from("/out"),
            "mp4",
        )
        .build()
        .unwrap();

        let outcome = h
            .interactor
            .execute(request, &RecordingProgressAdapter::new())
            .await;

        assert!(!outcome.ok);
        assert_eq!(outcome.error_kind.as_deref(), Some("validation"));
        assert!(h.transcode.plans.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_invocation_is_busy() {
        let h = harness(FakeFetch::default(), FakeFetch::default(), FakeTranscode::default());
        let _held = h.interactor.in_flight.try_lock().unwrap();

        let outcome = h
            .interactor
            .execute(
                remote("https://x.test/cat.png", MediaKind::Image, "jpg"),
                &RecordingProgressAdapter::new(),
            )
            .await;

        assert!(!outcome.ok);
        assert_eq!(outcome.error_kind.as_deref(), Some("busy"));
        assert!(h.direct.seen_dirs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spawned_conversion_streams_progress() {
        let h = harness(FakeFetch::default(), FakeFetch::default(), FakeTranscode::default());
        let root = h.root;
        let interactor = Arc::new(h.interactor);

        let (handle, mut rx) =
            interactor.spawn(remote("https://x.test/cat.png", MediaKind::Image, "png"));
        let outcome = handle.await.unwrap();

        assert!(outcome.ok);
        let mut notes = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ProgressEvent::TextNote { message } = event {
                notes.push(message);
            }
        }
        assert!(notes.iter().any(|n| n.starts_with("Download complete.")));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
