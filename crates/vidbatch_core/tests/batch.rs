//! End-to-end batch runs against in-memory archives and a fake transcoder.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::tempdir;
use vidbatch_core::archive::ZipArchiveReader;
use vidbatch_core::logging::BatchLogger;
use vidbatch_core::models::{NamingPolicy, ProcessingConfig};
use vidbatch_core::orchestrator::{
    BatchContext, BatchError, BatchPhase, BatchReport, BatchRunner, ErrorKind,
};
use vidbatch_core::transcode::{TranscodeError, TranscodeJob, TranscodeResult, Transcoder};
use zip::write::SimpleFileOptions;

/// Writes a placeholder output for every job and records it.
#[derive(Default)]
struct FakeTranscoder {
    jobs: Mutex<Vec<TranscodeJob>>,
    fail_on: Option<&'static str>,
}

impl FakeTranscoder {
    fn failing_on(file_name: &'static str) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            fail_on: Some(file_name),
        }
    }

    fn jobs(&self) -> Vec<TranscodeJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl Transcoder for FakeTranscoder {
    fn name(&self) -> &str {
        "fake-ffmpeg"
    }

    fn transcode(&self, job: &TranscodeJob) -> TranscodeResult<()> {
        self.jobs.lock().unwrap().push(job.clone());

        let input_name = job.input_path.file_name().unwrap().to_string_lossy();
        if self.fail_on == Some(input_name.as_ref()) {
            return Err(TranscodeError::failed(
                "fake-ffmpeg",
                Some(1),
                "Invalid data found when processing input",
            ));
        }

        fs::write(&job.output_path, b"transcoded").unwrap();
        Ok(())
    }
}

/// Seekable in-memory reader that records when it is dropped.
struct TrackedReader {
    inner: Cursor<Vec<u8>>,
    dropped: Arc<AtomicBool>,
}

impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for TrackedReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

/// Build a zip in memory. Names ending in `/` become directory entries.
fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

fn write_zip(dir: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join("clips.zip");
    fs::write(&path, build_zip(entries)).unwrap();
    path
}

fn runner(config: ProcessingConfig, transcoder: Arc<FakeTranscoder>) -> BatchRunner {
    BatchRunner::new(BatchContext::new(
        config,
        "clips",
        Arc::new(BatchLogger::silent()),
        transcoder,
    ))
}

fn run(config: ProcessingConfig, zip: &Path) -> (Result<BatchReport, BatchError>, Arc<FakeTranscoder>) {
    let transcoder = Arc::new(FakeTranscoder::default());
    let result = runner(config, transcoder.clone()).run(zip);
    (result, transcoder)
}

/// Every file under `root`, relative, with `/` separators.
fn files_under(root: &Path) -> BTreeSet<String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeSet<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                out.insert(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut out = BTreeSet::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn archive_without_candidates_succeeds_with_no_outputs() {
    let dir = tempdir().unwrap();
    let zip = write_zip(dir.path(), &[("docs/", b""), ("docs/notes.txt", b"hello")]);
    let out = dir.path().join("out");

    let (result, transcoder) = run(ProcessingConfig::new(&out), &zip);
    let report = result.unwrap();

    assert!(transcoder.jobs().is_empty());
    assert!(report.outputs.is_empty());
    assert_eq!(report.entries, 2);
    assert_eq!(files_under(&out), BTreeSet::from(["docs/notes.txt".to_string()]));
}

#[test]
fn mirrored_policy_keeps_layout_and_names_outputs_by_parameters() {
    let dir = tempdir().unwrap();
    let zip = write_zip(
        dir.path(),
        &[("a/", b""), ("a/b/", b""), ("a/b/clip.mp4", b"frames")],
    );
    let out = dir.path().join("out");

    let (result, transcoder) = run(ProcessingConfig::new(&out), &zip);
    let report = result.unwrap();

    let expected_output = out.join("a/b/clip_540_410_0.50.mp4");
    assert_eq!(report.outputs, vec![expected_output.clone()]);
    assert_eq!(report.directories_created, 2);
    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.intermediates_removed, 0);

    assert_eq!(fs::read(out.join("a/b/clip.mp4")).unwrap(), b"frames");
    assert!(expected_output.is_file());

    let jobs = transcoder.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].input_path, out.join("a/b/clip.mp4"));
    assert_eq!((jobs[0].width, jobs[0].height), (540, 410));
    assert!(jobs[0].drop_audio);
}

#[test]
fn runs_with_different_parameters_do_not_collide() {
    let dir = tempdir().unwrap();
    let zip = write_zip(dir.path(), &[("clip.mp4", b"frames")]);
    let out = dir.path().join("out");

    let (first, _) = run(ProcessingConfig::new(&out), &zip);
    let (second, _) = run(
        ProcessingConfig::new(&out)
            .with_dimensions(320, 240)
            .with_speed_factor(2.0),
        &zip,
    );
    first.unwrap();
    second.unwrap();

    assert_eq!(
        files_under(&out),
        BTreeSet::from([
            "clip.mp4".to_string(),
            "clip_320_240_2.00.mp4".to_string(),
            "clip_540_410_0.50.mp4".to_string(),
        ])
    );
}

#[test]
fn extension_match_ignores_case() {
    let dir = tempdir().unwrap();
    let zip = write_zip(
        dir.path(),
        &[("x/CLIP.MP4", b"1"), ("y/clip.Mp4", b"2"), ("z/clip.mov", b"3")],
    );
    let out = dir.path().join("out");

    let (result, transcoder) = run(ProcessingConfig::new(&out), &zip);
    let report = result.unwrap();

    assert_eq!(transcoder.jobs().len(), 2);
    assert_eq!(
        report.outputs,
        vec![
            out.join("x/CLIP_540_410_0.50.mp4"),
            out.join("y/clip_540_410_0.50.mp4"),
        ]
    );
    assert!(out.join("z/clip.mov").is_file());
}

#[test]
fn directory_entries_never_become_jobs() {
    let dir = tempdir().unwrap();
    let zip = write_zip(dir.path(), &[("videos.mp4/", b""), ("empty/", b"")]);

    for policy in [NamingPolicy::Mirrored, NamingPolicy::Flat] {
        let out = dir.path().join(format!("out-{}", policy));
        let (result, transcoder) = run(ProcessingConfig::new(&out).with_policy(policy), &zip);
        let report = result.unwrap();

        assert!(transcoder.jobs().is_empty(), "policy {}", policy);
        assert!(report.outputs.is_empty());
        match policy {
            NamingPolicy::Mirrored => {
                assert_eq!(report.directories_created, 2);
                assert!(out.join("videos.mp4").is_dir());
            }
            NamingPolicy::Flat => {
                assert_eq!(report.skipped.len(), 2);
                assert!(report.skipped.iter().all(|s| s.reason == "directory entry"));
            }
        }
    }
}

#[test]
fn failure_stops_the_batch_and_releases_the_archive() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let bytes = build_zip(&[
        ("a.mp4", b"a"),
        ("b.mp4", b"b"),
        ("c.mp4", b"c"),
        ("d.mp4", b"d"),
        ("e.mp4", b"e"),
    ]);

    let dropped = Arc::new(AtomicBool::new(false));
    let reader = ZipArchiveReader::from_reader(TrackedReader {
        inner: Cursor::new(bytes),
        dropped: dropped.clone(),
    })
    .unwrap();

    let transcoder = Arc::new(FakeTranscoder::failing_on("c.mp4"));
    let runner = runner(ProcessingConfig::new(&out), transcoder.clone());
    let err = runner.run_source(reader).unwrap_err();

    assert!(dropped.load(Ordering::SeqCst));
    assert_eq!(runner.phase(), BatchPhase::Failed);
    assert_eq!(err.kind(), ErrorKind::ExternalTool);
    match err {
        BatchError::EntryFailed {
            index, entry, step, ..
        } => {
            assert_eq!(index, 2);
            assert_eq!(entry, "c.mp4");
            assert_eq!(step, "Transcode");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(transcoder.jobs().len(), 3);
    assert!(!out.join("d.mp4").exists());
    assert!(!out.join("e.mp4").exists());
}

#[test]
fn flat_policy_leaves_only_prefixed_outputs() {
    let dir = tempdir().unwrap();
    let zip = write_zip(
        dir.path(),
        &[
            ("a/", b""),
            ("a/one.mp4", b"1"),
            ("b/two.MP4", b"2"),
            ("readme.txt", b"skip me"),
        ],
    );
    let out = dir.path().join("out");

    let (result, _) = run(
        ProcessingConfig::new(&out).with_policy(NamingPolicy::Flat),
        &zip,
    );
    let report = result.unwrap();

    assert_eq!(
        files_under(&out),
        BTreeSet::from(["output_one.mp4".to_string(), "output_two.MP4".to_string()])
    );
    assert_eq!(report.intermediates_removed, 2);
    assert_eq!(report.skipped.len(), 2);
    assert!(report
        .skipped
        .iter()
        .any(|s| s.name == "readme.txt" && s.reason == "not a video candidate"));
}

#[test]
fn same_base_name_under_flat_policy_is_a_collision() {
    let dir = tempdir().unwrap();
    let zip = write_zip(dir.path(), &[("a/clip.mp4", b"1"), ("b/clip.mp4", b"2")]);
    let out = dir.path().join("out");

    let (result, transcoder) = run(
        ProcessingConfig::new(&out).with_policy(NamingPolicy::Flat),
        &zip,
    );
    let err = result.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Plan);
    assert_eq!(err.entry_index(), Some(1));
    assert_eq!(transcoder.jobs().len(), 1);
}

#[test]
fn no_overwrite_refuses_existing_extracted_file() {
    let dir = tempdir().unwrap();
    let zip = write_zip(dir.path(), &[("clip.mp4", b"new")]);
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("clip.mp4"), b"old").unwrap();

    let (result, transcoder) = run(
        ProcessingConfig::new(&out).with_overwrite_extracted(false),
        &zip,
    );
    let err = result.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExtractionIo);
    assert!(matches!(err, BatchError::EntryFailed { ref step, .. } if step == "Extract"));
    assert_eq!(fs::read(out.join("clip.mp4")).unwrap(), b"old");
    assert!(transcoder.jobs().is_empty());
}

#[test]
fn entries_escaping_the_output_root_are_rejected() {
    let dir = tempdir().unwrap();
    let zip = write_zip(dir.path(), &[("../evil.mp4", b"x")]);
    let out = dir.path().join("out");

    let (result, _) = run(ProcessingConfig::new(&out), &zip);
    let err = result.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Plan);
    assert!(!dir.path().join("evil.mp4").exists());
}

#[test]
fn report_serializes_to_json() {
    let dir = tempdir().unwrap();
    let zip = write_zip(dir.path(), &[("clip.mp4", b"frames")]);
    let out = dir.path().join("out");

    let (result, _) = run(ProcessingConfig::new(&out), &zip);
    let json = result.unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["policy"], "mirrored");
    assert_eq!(value["entries"], 1);
    assert_eq!(value["outputs"].as_array().unwrap().len(), 1);
}
