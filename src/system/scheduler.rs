//! 압축 해제 스케줄러
//!
//! 요청마다 작업 스레드를 하나 띄우고, 진행률/완료 이벤트를 제한된 채널로
//! 돌려보낸다. 이벤트는 소비자가 자기 스레드에서 `poll`/`wait_event`를 호출할 때만
//! 전달되며, 작업 스레드가 소비자 코드를 직접 부르는 일은 없다.
//!
//! 같은 대상 디렉토리를 쓰는 작업은 디렉토리별 잠금으로 차례대로 실행된다.
//! 서로 다른 대상 디렉토리는 동시에 풀린다.

use crate::models::{
    ArchiveRecord, ExtractionJob, ExtractionSummary, JobId, JobState, ProgressEvent,
};
use crate::system::extract::ExtractionTask;
use crate::utils::error::{Result, ToolshelfError};
use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

/// 이벤트 채널 용량
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// shutdown 중 이벤트 대기 간격
const SHUTDOWN_WAIT: Duration = Duration::from_millis(20);

/// 작업 스레드가 채널로 보내는 메시지
#[derive(Debug)]
enum WorkerMessage {
    Started(JobId),
    Progress(JobId, ProgressEvent),
    Finished(JobId, Result<ExtractionSummary>),
}

/// 소비자에게 전달되는 이벤트
#[derive(Debug)]
pub enum SchedulerEvent {
    /// 대상 디렉토리 잠금을 얻고 실제 해제를 시작함
    Started { job: JobId },
    Progress { job: JobId, event: ProgressEvent },
    /// 작업 종료 (성공/취소/실패). 마지막 작업 상태를 함께 넘긴다.
    Finished {
        job: ExtractionJob,
        result: Result<ExtractionSummary>,
    },
}

impl SchedulerEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            SchedulerEvent::Started { job } | SchedulerEvent::Progress { job, .. } => *job,
            SchedulerEvent::Finished { job, .. } => job.id,
        }
    }
}

type DestinationLocks = Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

struct WorkerSlot {
    job: ExtractionJob,
    join_handle: Option<JoinHandle<()>>,
}

/// 압축 해제 스케줄러
pub struct ExtractionScheduler {
    working_root: PathBuf,
    events_tx: SyncSender<WorkerMessage>,
    events_rx: Receiver<WorkerMessage>,
    workers: BTreeMap<JobId, WorkerSlot>,
    destination_locks: DestinationLocks,
    next_id: u64,
}

impl ExtractionScheduler {
    pub fn new(working_root: PathBuf) -> Self {
        let (events_tx, events_rx) = mpsc::sync_channel(EVENT_CHANNEL_CAPACITY);
        Self {
            working_root,
            events_tx,
            events_rx,
            workers: BTreeMap::new(),
            destination_locks: Mutex::new(HashMap::new()),
            next_id: 1,
        }
    }

    /// 압축 해제 요청
    ///
    /// 같은 항목을 여러 번 요청해도 중복 제거하지 않는다. 두 작업은 같은
    /// 대상 디렉토리 잠금을 두고 순서대로 실행된다.
    pub fn submit(&mut self, record: ArchiveRecord, open_when_done: bool) -> JobId {
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let task = ExtractionTask::new(record.clone(), &self.working_root)
            .with_cancel_flag(Arc::clone(&cancel_flag));
        let destination = task.destination().to_path_buf();
        self.spawn_job(record, destination, open_when_done, cancel_flag, move |on_progress| {
            task.run(on_progress)
        })
    }

    /// 작업 스레드를 띄우고 작업 상태를 등록
    fn spawn_job<W>(
        &mut self,
        record: ArchiveRecord,
        destination: PathBuf,
        open_when_done: bool,
        cancel_flag: Arc<AtomicBool>,
        work: W,
    ) -> JobId
    where
        W: FnOnce(&mut dyn FnMut(ProgressEvent)) -> Result<ExtractionSummary> + Send + 'static,
    {
        let id = JobId(self.next_id);
        self.next_id += 1;

        self.prune_locks();
        let lock = self.destination_lock(&destination);
        let tx = self.events_tx.clone();
        let archive = record.filepath.clone();

        tracing::info!(job = %id, archive = %archive.display(), "extraction requested");
        let handle = std::thread::spawn(move || run_worker(id, archive, work, lock, tx));

        let job = ExtractionJob::new(id, record, destination, open_when_done, cancel_flag);
        self.workers.insert(
            id,
            WorkerSlot {
                job,
                join_handle: Some(handle),
            },
        );
        id
    }

    /// 대기 중인 이벤트를 모두 꺼내 작업 상태에 반영 (블로킹 없음)
    pub fn poll(&mut self) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();
        while let Ok(message) = self.events_rx.try_recv() {
            events.extend(self.deliver(message));
        }
        events
    }

    /// 이벤트 하나를 최대 `timeout` 동안 기다림
    pub fn wait_event(&mut self, timeout: Duration) -> Option<SchedulerEvent> {
        match self.events_rx.recv_timeout(timeout) {
            Ok(message) => self.deliver(message),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn cancel(&self, job: JobId) -> bool {
        match self.workers.get(&job) {
            Some(slot) => {
                slot.job.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for slot in self.workers.values() {
            slot.job.cancel();
        }
    }

    /// 진행 중인 작업 (요청 순서)
    pub fn active_jobs(&self) -> impl Iterator<Item = &ExtractionJob> {
        self.workers.values().map(|slot| &slot.job)
    }

    pub fn job(&self, id: JobId) -> Option<&ExtractionJob> {
        self.workers.get(&id).map(|slot| &slot.job)
    }

    pub fn has_active_jobs(&self) -> bool {
        !self.workers.is_empty()
    }

    /// 가장 최근에 요청된 작업
    pub fn latest_job(&self) -> Option<JobId> {
        self.workers.keys().next_back().copied()
    }

    /// 모든 작업을 취소하고 스레드 종료를 기다림
    ///
    /// 완료 이벤트를 받으며 작업을 정리하므로 채널이 가득 차 작업 스레드가
    /// 막히지 않는다. 남은 이벤트는 버린다.
    pub fn shutdown(&mut self) {
        self.cancel_all();
        while self.has_active_jobs() {
            if self.wait_event(SHUTDOWN_WAIT).is_none() {
                // 완료 이벤트 없이 끝난 스레드
                self.workers.retain(|_, slot| {
                    !slot
                        .join_handle
                        .as_ref()
                        .is_some_and(JoinHandle::is_finished)
                });
            }
        }
        while self.events_rx.try_recv().is_ok() {}
    }

    /// 작업 상태에 반영하고 소비자용 이벤트로 변환
    ///
    /// 이미 정리된 작업(shutdown 이후)의 메시지는 버린다.
    fn deliver(&mut self, message: WorkerMessage) -> Option<SchedulerEvent> {
        match message {
            WorkerMessage::Started(job) => {
                let slot = self.workers.get_mut(&job)?;
                slot.job.state = JobState::Running;
                Some(SchedulerEvent::Started { job })
            }
            WorkerMessage::Progress(job, event) => {
                let slot = self.workers.get_mut(&job)?;
                slot.job.apply(&event);
                Some(SchedulerEvent::Progress { job, event })
            }
            WorkerMessage::Finished(job, result) => {
                let mut slot = self.workers.remove(&job)?;
                if let Some(handle) = slot.join_handle.take() {
                    let _ = handle.join();
                }
                self.prune_locks();
                Some(SchedulerEvent::Finished {
                    job: slot.job,
                    result,
                })
            }
        }
    }

    fn destination_lock(&self, destination: &Path) -> Arc<Mutex<()>> {
        let mut locks = self
            .destination_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(destination.to_path_buf()).or_default())
    }

    /// 더 이상 쓰는 작업이 없는 잠금 정리
    fn prune_locks(&self) {
        let mut locks = self
            .destination_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

impl Drop for ExtractionScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker<W>(
    id: JobId,
    archive: PathBuf,
    work: W,
    lock: Arc<Mutex<()>>,
    tx: SyncSender<WorkerMessage>,
) where
    W: FnOnce(&mut dyn FnMut(ProgressEvent)) -> Result<ExtractionSummary>,
{
    // 완료 이벤트를 보낼 때까지 잠금을 유지해야 이벤트 순서가 섞이지 않는다
    let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
    let _ = tx.send(WorkerMessage::Started(id));

    let mut on_progress = |event: ProgressEvent| {
        let _ = tx.send(WorkerMessage::Progress(id, event));
    };
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| work(&mut on_progress)))
        .unwrap_or_else(|_| Err(ToolshelfError::WorkerPanicked { archive }));

    match &result {
        Ok(summary) if summary.cancelled => tracing::info!(job = %id, "extraction cancelled"),
        Ok(_) => tracing::info!(job = %id, "extraction completed"),
        Err(err) => tracing::error!(job = %id, error = %err, "extraction failed"),
    }
    let _ = tx.send(WorkerMessage::Finished(id, result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions as ZipFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, data) in entries {
            writer
                .start_file(*name, ZipFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    fn record_for(path: &Path, name: &str) -> ArchiveRecord {
        ArchiveRecord::new(path.to_path_buf(), "tools".to_string(), name.to_string())
    }

    /// 지정한 작업들이 모두 끝날 때까지 이벤트 수집
    fn drain_until_finished(
        scheduler: &mut ExtractionScheduler,
        jobs: &[JobId],
    ) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();
        let mut remaining: Vec<JobId> = jobs.to_vec();
        let mut guard = 0usize;
        while !remaining.is_empty() && guard < 1_000 {
            if let Some(event) = scheduler.wait_event(Duration::from_millis(50)) {
                if let SchedulerEvent::Finished { job, .. } = &event {
                    remaining.retain(|j| *j != job.id);
                }
                events.push(event);
            }
            guard += 1;
        }
        assert!(remaining.is_empty(), "jobs did not finish: {:?}", remaining);
        events
    }

    #[test]
    fn test_progress_and_completion_are_delivered_through_channel() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.zip");
        write_zip(&archive, &[("a.txt", b"a"), ("b.txt", b"b"), ("c.txt", b"c")]);
        let mut scheduler = ExtractionScheduler::new(temp.path().join("work"));

        let id = scheduler.submit(record_for(&archive, "tool"), true);
        assert!(scheduler.has_active_jobs());
        assert!(scheduler.job(id).unwrap().open_when_done);

        let events = drain_until_finished(&mut scheduler, &[id]);

        assert!(matches!(events.first(), Some(SchedulerEvent::Started { .. })));
        let progress: Vec<&ProgressEvent> = events
            .iter()
            .filter_map(|e| match e {
                SchedulerEvent::Progress { event, .. } => Some(event),
                _ => None,
            })
            .collect();
        assert_eq!(progress.len(), 4);
        assert!(progress.last().unwrap().is_done());
        match events.last() {
            Some(SchedulerEvent::Finished { job, result: Ok(summary) }) => {
                assert_eq!(job.id, id);
                assert!(job.open_when_done);
                assert_eq!(job.record.name, "tool");
                assert_eq!(summary.destination, temp.path().join("work").join("tool"));
                assert_eq!(summary.entries_extracted, 3);
            }
            other => panic!("expected successful finish, got {:?}", other),
        }
        assert!(!scheduler.has_active_jobs());
        assert!(events.iter().all(|e| e.job_id() == id));
    }

    #[test]
    fn test_failure_is_reported_as_finished_error() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, b"garbage").unwrap();
        let mut scheduler = ExtractionScheduler::new(temp.path().join("work"));

        let id = scheduler.submit(record_for(&archive, "broken"), false);
        let events = drain_until_finished(&mut scheduler, &[id]);

        assert!(!events.iter().any(|e| matches!(
            e,
            SchedulerEvent::Progress { event, .. } if event.is_done()
        )));
        match events.last() {
            Some(SchedulerEvent::Finished { result: Err(err), .. }) => {
                assert!(err.is_extraction_error())
            }
            other => panic!("expected failed finish, got {:?}", other),
        }
    }

    #[test]
    fn test_same_destination_requests_run_one_after_another() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.zip");
        let entries: Vec<(String, Vec<u8>)> = (0..20)
            .map(|i| (format!("f{}.txt", i), vec![b'x'; 1024]))
            .collect();
        let borrowed: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(n, d)| (n.as_str(), d.as_slice()))
            .collect();
        write_zip(&archive, &borrowed);
        let mut scheduler = ExtractionScheduler::new(temp.path().join("work"));

        let first = scheduler.submit(record_for(&archive, "tool"), false);
        let second = scheduler.submit(record_for(&archive, "tool"), false);
        let events = drain_until_finished(&mut scheduler, &[first, second]);

        // 한 작업의 Started~Finished 구간 안에 다른 작업의 이벤트가 끼지 않는다
        let order: Vec<JobId> = events.iter().map(SchedulerEvent::job_id).collect();
        let first_job = order[0];
        let switch = order.iter().position(|j| *j != first_job).unwrap();
        assert!(order[switch..].iter().all(|j| *j != first_job));
        assert!(matches!(events[switch - 1], SchedulerEvent::Finished { .. }));

        let extracted = fs::read_dir(temp.path().join("work").join("tool"))
            .unwrap()
            .count();
        assert_eq!(extracted, 20);
    }

    #[test]
    fn test_cancel_unknown_job_returns_false() {
        let temp = TempDir::new().unwrap();
        let scheduler = ExtractionScheduler::new(temp.path().join("work"));
        assert!(!scheduler.cancel(JobId(42)));
        assert!(scheduler.latest_job().is_none());
    }

    #[test]
    fn test_cancelled_job_finishes_with_cancelled_summary() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.zip");
        write_zip(&archive, &[("a.txt", b"a")]);
        let work = temp.path().join("work");
        let mut scheduler = ExtractionScheduler::new(work.clone());

        // 잠금을 미리 잡아 작업을 대기시킨 뒤 취소
        let blocker = scheduler.destination_lock(&work.join("tool"));
        let guard = blocker.lock().unwrap();
        let id = scheduler.submit(record_for(&archive, "tool"), false);
        assert_eq!(scheduler.latest_job(), Some(id));
        assert!(scheduler.cancel(id));
        assert!(scheduler.job(id).unwrap().is_cancel_requested());
        drop(guard);

        let events = drain_until_finished(&mut scheduler, &[id]);
        match events.last() {
            Some(SchedulerEvent::Finished { result: Ok(summary), .. }) => {
                assert!(summary.cancelled);
                assert_eq!(summary.entries_extracted, 0);
            }
            other => panic!("expected cancelled finish, got {:?}", other),
        }
    }

    #[test]
    fn test_panicking_worker_finishes_and_releases_lock() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.zip");
        write_zip(&archive, &[("a.txt", b"a")]);
        let work = temp.path().join("work");
        let mut scheduler = ExtractionScheduler::new(work.clone());
        let record = record_for(&archive, "tool");

        let panicked = scheduler.spawn_job(
            record.clone(),
            work.join("tool"),
            false,
            Arc::new(AtomicBool::new(false)),
            |on_progress| -> Result<ExtractionSummary> {
                on_progress(ProgressEvent::for_entry(0, 1, "a.txt".to_string()));
                panic!("worker exploded");
            },
        );
        let events = drain_until_finished(&mut scheduler, &[panicked]);

        match events.last() {
            Some(SchedulerEvent::Finished {
                job,
                result: Err(ToolshelfError::WorkerPanicked { archive: path }),
            }) => {
                assert_eq!(job.id, panicked);
                assert_eq!(path, &archive);
            }
            other => panic!("expected WorkerPanicked finish, got {:?}", other),
        }
        assert!(!scheduler.has_active_jobs());
        assert!(scheduler
            .destination_lock(&work.join("tool"))
            .try_lock()
            .is_ok());

        // 같은 대상 디렉토리의 다음 요청이 막히지 않는다
        let next = scheduler.submit(record, false);
        let events = drain_until_finished(&mut scheduler, &[next]);
        assert!(matches!(
            events.last(),
            Some(SchedulerEvent::Finished { result: Ok(_), .. })
        ));
        assert!(work.join("tool").join("a.txt").is_file());
    }

    #[test]
    fn test_shutdown_joins_workers() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tool.zip");
        write_zip(&archive, &[("a.txt", b"a")]);
        let mut scheduler = ExtractionScheduler::new(temp.path().join("work"));

        scheduler.submit(record_for(&archive, "tool"), false);
        scheduler.submit(record_for(&archive, "tool"), false);
        scheduler.shutdown();

        assert!(!scheduler.has_active_jobs());
        assert_eq!(scheduler.active_jobs().count(), 0);
    }
}
