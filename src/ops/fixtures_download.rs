//! The `prep` operation: materialize every fixture of a manifest.
//!
//! Symlinks are created first, one after another. Repository and forge
//! module jobs then run on a bounded pool of worker threads that drain one
//! shared queue; since every job is queued up front, a worker exits as soon
//! as it finds the queue empty. A failing job never stops its siblings. All
//! failures are reported together once the pool has drained.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};

use crate::core::{FetchSpec, FixtureError, Fixtures};
use crate::ops::normalize::load_fixtures;
use crate::sources::{backend_for, ForgeInstaller, SymlinkManager};
use crate::util::fs::ensure_dir;
use crate::util::FixturesContext;

/// Performs the fetch work of a single job.
pub trait FixtureFetcher: Send + Sync {
    /// Clone or update a repository fixture.
    fn fetch_repository(&self, spec: &FetchSpec) -> Result<()>;

    /// Install a forge module fixture.
    fn install_module(&self, spec: &FetchSpec) -> Result<()>;
}

/// Fetches by running `git`, `hg` and `puppet`.
#[derive(Debug, Clone, Default)]
pub struct ProcessFetcher {
    forge: ForgeInstaller,
}

impl ProcessFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FixtureFetcher for ProcessFetcher {
    fn fetch_repository(&self, spec: &FetchSpec) -> Result<()> {
        let backend = backend_for(spec.scm.unwrap_or_default());
        let outcome = backend.download(spec)?;
        tracing::debug!("{} {}: {:?}", backend.name(), spec.target.display(), outcome);
        Ok(())
    }

    fn install_module(&self, spec: &FetchSpec) -> Result<()> {
        let outcome = self.forge.install(spec)?;
        tracing::debug!("forge {}: {:?}", spec.target.display(), outcome);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Job<'a> {
    Repository(&'a FetchSpec),
    ForgeModule(&'a FetchSpec),
}

impl<'a> Job<'a> {
    fn spec(&self) -> &'a FetchSpec {
        match *self {
            Job::Repository(spec) | Job::ForgeModule(spec) => spec,
        }
    }

    fn run(&self, fetcher: &dyn FixtureFetcher) -> Result<()> {
        match *self {
            Job::Repository(spec) => fetcher.fetch_repository(spec),
            Job::ForgeModule(spec) => fetcher.install_module(spec),
        }
    }
}

/// Number of workers for `queue_size` jobs: never more than `max_threads`,
/// never more than there are jobs.
pub fn worker_count(max_threads: usize, queue_size: usize) -> usize {
    max_threads.max(1).min(queue_size)
}

/// Load the manifest for `ctx` and download everything it declares.
pub fn prep(ctx: &FixturesContext) -> Result<()> {
    let fixtures = load_fixtures(ctx)?;
    download(ctx, &fixtures, &ProcessFetcher::new())
}

/// Materialize `fixtures`, dispatching fetch work to `fetcher`.
pub fn download(
    ctx: &FixturesContext,
    fixtures: &Fixtures,
    fetcher: &dyn FixtureFetcher,
) -> Result<()> {
    let target_dir = ctx.module_target_dir();
    tracing::debug!("Downloading to {}", target_dir.display());
    ensure_dir(&target_dir)?;

    if fixtures.is_empty() {
        tracing::debug!("No fixtures declared");
        return Ok(());
    }

    let mut failures = create_symlinks(fixtures);

    let jobs: VecDeque<Job<'_>> = fixtures
        .repositories
        .values()
        .map(Job::Repository)
        .chain(fixtures.forge_modules.values().map(Job::ForgeModule))
        .collect();

    if jobs.is_empty() {
        tracing::debug!("Nothing to download");
    } else {
        let workers = worker_count(ctx.max_threads(), jobs.len());
        tracing::debug!(
            "Download queue size: {}; using {} threads",
            jobs.len(),
            workers
        );
        failures.extend(run_jobs(jobs, workers, fetcher)?);
    }

    if !failures.is_empty() {
        return Err(FixtureError::Batch { failures }.into());
    }

    Ok(())
}

/// Create all symlinks in order. A failed link is reported like a failed
/// download of its target.
fn create_symlinks(fixtures: &Fixtures) -> Vec<FixtureError> {
    if fixtures.symlinks.is_empty() {
        tracing::debug!("No symlinks to create");
    }

    let symlinks = SymlinkManager::new();
    let mut failures = Vec::new();
    for entry in fixtures.symlinks.values() {
        if let Err(e) = symlinks.materialize(entry) {
            tracing::error!("{:#}", e);
            failures.push(FixtureError::fetch(
                entry.target.display().to_string(),
                &entry.link,
                e,
            ));
        }
    }
    failures
}

fn run_jobs(
    jobs: VecDeque<Job<'_>>,
    workers: usize,
    fetcher: &dyn FixtureFetcher,
) -> Result<Vec<FixtureError>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("fixture-worker-{}", i))
        .build()
        .context("failed to start download workers")?;

    let queue = Mutex::new(jobs);
    let failures = Mutex::new(Vec::new());

    pool.scope(|s| {
        for _ in 0..workers {
            s.spawn(|_| loop {
                // The guard is dropped before the job runs
                let next = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                let Some(job) = next else {
                    break;
                };

                let spec = job.spec();
                if let Err(e) = job.run(fetcher) {
                    tracing::error!(
                        "Failed to fetch {} into {}: {:#}",
                        spec.remote,
                        spec.target.display(),
                        e
                    );
                    failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(FixtureError::fetch(&spec.remote, &spec.target, e));
                }
            });
        }
    });

    let mut failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
    failures.sort_by_key(|f| match f {
        FixtureError::Fetch { target, .. } => target.clone(),
        _ => Default::default(),
    });
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::core::SymlinkEntry;
    use crate::util::fs::is_symlink;

    /// Tracks how many jobs ran and how many overlapped.
    #[derive(Default)]
    struct CountingFetcher {
        running: AtomicUsize,
        peak: AtomicUsize,
        done: AtomicUsize,
    }

    impl CountingFetcher {
        fn work(&self, spec: &FetchSpec) -> Result<()> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            self.running.fetch_sub(1, Ordering::SeqCst);
            self.done.fetch_add(1, Ordering::SeqCst);

            if spec.remote.contains("broken") {
                anyhow::bail!("remote hung up");
            }
            Ok(())
        }
    }

    impl FixtureFetcher for CountingFetcher {
        fn fetch_repository(&self, spec: &FetchSpec) -> Result<()> {
            self.work(spec)
        }

        fn install_module(&self, spec: &FetchSpec) -> Result<()> {
            self.work(spec)
        }
    }

    fn repo(fixtures: &mut Fixtures, dir: &Path, name: &str) {
        let remote = format!("https://example.com/{}.git", name);
        let spec = FetchSpec::new(remote.as_str(), dir.join(name));
        fixtures.repositories.insert(remote, spec);
    }

    fn context(dir: &Path, max_threads: usize) -> FixturesContext {
        let mut ctx = FixturesContext::with_source_dir(dir.to_path_buf());
        ctx.set_max_threads(max_threads);
        ctx
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(worker_count(10, 11), 10);
        assert_eq!(worker_count(10, 3), 3);
        assert_eq!(worker_count(0, 3), 1);
        assert_eq!(worker_count(10, 0), 0);
    }

    #[test]
    fn test_pool_is_bounded() {
        let tmp = TempDir::new().unwrap();
        let mut fixtures = Fixtures::new();
        for i in 0..8 {
            repo(&mut fixtures, tmp.path(), &format!("repo{}", i));
        }
        for i in 0..3 {
            let name = format!("acme-mod{}", i);
            fixtures
                .forge_modules
                .insert(name.clone(), FetchSpec::new(name.as_str(), tmp.path().join(&name)));
        }
        assert_eq!(fixtures.job_count(), 11);

        let fetcher = CountingFetcher::default();
        download(&context(tmp.path(), 10), &fixtures, &fetcher).unwrap();

        assert_eq!(fetcher.done.load(Ordering::SeqCst), 11);
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 10);
        assert!(fetcher.peak.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_single_thread_runs_everything() {
        let tmp = TempDir::new().unwrap();
        let mut fixtures = Fixtures::new();
        for name in ["a", "b", "c"] {
            repo(&mut fixtures, tmp.path(), name);
        }

        let fetcher = CountingFetcher::default();
        download(&context(tmp.path(), 1), &fixtures, &fetcher).unwrap();

        assert_eq!(fetcher.done.load(Ordering::SeqCst), 3);
        assert_eq!(fetcher.peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nothing_to_download() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(tmp.path(), 10);

        let fetcher = CountingFetcher::default();
        download(&ctx, &Fixtures::new(), &fetcher).unwrap();

        assert_eq!(fetcher.done.load(Ordering::SeqCst), 0);
        assert!(ctx.module_target_dir().is_dir());
    }

    #[test]
    fn test_failures_do_not_stop_siblings() {
        let tmp = TempDir::new().unwrap();
        let mut fixtures = Fixtures::new();
        for name in ["a", "broken", "c", "d"] {
            repo(&mut fixtures, tmp.path(), name);
        }

        let fetcher = CountingFetcher::default();
        let err = download(&context(tmp.path(), 2), &fixtures, &fetcher).unwrap_err();

        assert_eq!(fetcher.done.load(Ordering::SeqCst), 4);
        match err.downcast_ref::<FixtureError>() {
            Some(FixtureError::Batch { failures }) => {
                assert_eq!(failures.len(), 1);
                let msg = failures[0].to_string();
                assert!(msg.contains("https://example.com/broken.git"));
                assert!(msg.contains(&tmp.path().join("broken").display().to_string()));
            }
            other => panic!("expected a batch error, got {:?}", other),
        }
        assert!(err.to_string().contains("remote hung up"));
    }

    #[test]
    fn test_failed_symlink_does_not_stop_jobs() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(tmp.path(), 2);
        let busy = ctx.module_target_dir().join("busy");
        fs::create_dir_all(&busy).unwrap();

        let mut fixtures = Fixtures::new();
        fixtures
            .symlinks
            .insert("busy".into(), SymlinkEntry::new(&busy, tmp.path()));
        repo(&mut fixtures, tmp.path(), "a");

        let fetcher = CountingFetcher::default();
        let err = download(&ctx, &fixtures, &fetcher).unwrap_err();

        assert_eq!(fetcher.done.load(Ordering::SeqCst), 1);
        let msg = err.to_string();
        assert!(msg.contains("failed to download 1 fixture(s)"));
        assert!(msg.contains("a directory is in the way"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_created_before_jobs() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(tmp.path(), 4);
        let link = ctx.module_target_dir().join("mymod");

        let mut fixtures = Fixtures::new();
        fixtures
            .symlinks
            .insert("mymod".into(), SymlinkEntry::new(&link, tmp.path()));
        repo(&mut fixtures, tmp.path(), "a");

        struct LinkCheck<'a>(&'a Path);
        impl FixtureFetcher for LinkCheck<'_> {
            fn fetch_repository(&self, _spec: &FetchSpec) -> Result<()> {
                anyhow::ensure!(is_symlink(self.0), "symlink missing");
                Ok(())
            }
            fn install_module(&self, _spec: &FetchSpec) -> Result<()> {
                Ok(())
            }
        }

        download(&ctx, &fixtures, &LinkCheck(&link)).unwrap();
        assert!(is_symlink(&link));
    }
}
