use std::io::{self, Write};
use std::path::{Path, PathBuf};

use decor_call::{
    DispatchError, DispatchOptions, Kwargs, RemapError, RenameTable, SniffOptions, Source, remap,
    run, uncompress, uncompress_kwargs,
};
use serde_json::{Value, json};

fn tar_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap()
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn bzip(data: &[u8]) -> Vec<u8> {
    let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn zip_bytes(members: &[(&str, &[u8])], comment: Option<&str>) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(io::Cursor::new(Vec::new()));
    for (name, data) in members {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    if let Some(comment) = comment {
        writer.set_comment(comment);
    }
    writer.finish().unwrap().into_inner()
}

fn kwargs(value: Value) -> Kwargs {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Input file plus a private temp directory for staged payloads.
struct Fixture {
    input: tempfile::TempDir,
    temps: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            input: tempfile::tempdir().unwrap(),
            temps: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.input.path().join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    fn options(&self) -> DispatchOptions { DispatchOptions::new().temp_dir(self.temps.path()) }

    fn leftover_temps(&self) -> usize { std::fs::read_dir(self.temps.path()).unwrap().count() }
}

/// Reader that records every path it was given and returns the file contents.
#[derive(Default)]
struct Recorder {
    paths: Vec<PathBuf>,
}

impl Recorder {
    fn read(&mut self, source: Source<()>) -> io::Result<Vec<String>> {
        let path = source.as_path().unwrap().to_path_buf();
        self.paths.push(path.clone());
        Ok(vec![std::fs::read_to_string(path)?])
    }
}

fn dispatch(path: &Path, options: &DispatchOptions, recorder: &mut Recorder) -> Vec<String> {
    run(Source::Path(path.to_path_buf()), &(), options, |s, _| recorder.read(s)).unwrap()
}

#[test]
fn non_archive_is_read_directly() {
    let fx = Fixture::new();
    let path = fx.write("trace.txt", b"plain");

    let mut direct = Recorder::default();
    let expected = direct.read(Source::Path(path.clone())).unwrap();

    let mut wrapped = Recorder::default();
    assert_eq!(dispatch(&path, &fx.options(), &mut wrapped), expected);
    assert_eq!(wrapped.paths, [path]);
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn tar_members_are_read_in_order_and_merged() {
    let fx = Fixture::new();
    let path = fx.write(
        "traces.tar",
        &tar_bytes(&[("a", b"one"), ("empty", b""), ("b", b"two"), ("c", b"three")]),
    );

    let mut rec = Recorder::default();
    let out = dispatch(&path, &fx.options(), &mut rec);
    assert_eq!(out, ["one", "two", "three"]);
    assert_eq!(rec.paths.len(), 3);
    assert!(rec.paths.iter().all(|p| p != &path && !p.exists()));
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn compressed_tars_are_unpacked() {
    let fx = Fixture::new();
    let tar = tar_bytes(&[("a", b"one"), ("b", b"two")]);
    for (name, data) in [("x.tar.gz", gzip(&tar)), ("x.tar.bz2", bzip(&tar)), ("x.tgz", gzip(&tar))] {
        let path = fx.write(name, &data);
        let mut rec = Recorder::default();
        assert_eq!(dispatch(&path, &fx.options(), &mut rec), ["one", "two"], "{name}");
    }
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn zip_members_are_read_in_order() {
    let fx = Fixture::new();
    let path = fx.write("traces.zip", &zip_bytes(&[("b", b"two"), ("a", b"one")], None));

    let mut rec = Recorder::default();
    assert_eq!(dispatch(&path, &fx.options(), &mut rec), ["two", "one"]);
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn opted_out_zip_is_read_as_is() {
    let fx = Fixture::new();
    let path = fx.write(
        "traces.zip",
        &zip_bytes(&[("a", b"one")], Some("built by tool; decor_no_uncompress")),
    );

    let mut calls = Vec::new();
    let out = run(Source::<()>::Path(path.clone()), &(), &fx.options(), |s, _| {
        calls.push(s.as_path().unwrap().to_path_buf());
        Ok::<_, io::Error>(vec![std::fs::read(s.as_path().unwrap())?.len()])
    })
    .unwrap();
    assert_eq!(calls, [path.clone()]);
    assert_eq!(out, [std::fs::metadata(&path).unwrap().len() as usize]);
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn custom_opt_out_marker() {
    let fx = Fixture::new();
    let path = fx.write("traces.zip", &zip_bytes(&[("a", b"one")], Some("keep-packed")));
    let options = fx.options().sniff(SniffOptions::new().opt_out_marker("keep-packed"));

    let mut rec = Recorder::default();
    let out = run(Source::<()>::Path(path.clone()), &(), &options, |s, _| {
        rec.paths.push(s.as_path().unwrap().to_path_buf());
        Ok::<_, io::Error>(vec![s.as_path().unwrap().to_path_buf()])
    });
    assert_eq!(out.unwrap(), [path.clone()]);
    assert_eq!(rec.paths, [path]);
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn gzip_and_bzip2_streams() {
    let fx = Fixture::new();
    let gz = fx.write("trace.mseed.gz", &gzip(b"gz payload"));
    let bz = fx.write("trace.mseed.bz2", &bzip(b"bz payload"));

    let mut rec = Recorder::default();
    assert_eq!(dispatch(&gz, &fx.options(), &mut rec), ["gz payload"]);
    assert_eq!(dispatch(&bz, &fx.options(), &mut rec), ["bz payload"]);
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn corrupt_gzip_falls_back_to_original() {
    let fx = Fixture::new();
    let path = fx.write("trace.gz", b"this is not gzip at all");

    let mut rec = Recorder::default();
    let out = dispatch(&path, &fx.options(), &mut rec);
    assert_eq!(out, ["this is not gzip at all"]);
    assert_eq!(rec.paths, [path]);
}

#[test]
fn reader_failure_stops_and_cleans_up() {
    let fx = Fixture::new();
    let path = fx.write(
        "traces.tar",
        &tar_bytes(&[("a", b"1"), ("b", b"2"), ("c", b"3"), ("d", b"4")]),
    );

    let mut seen = Vec::new();
    let err = run(Source::<()>::Path(path), &(), &fx.options(), |s, _| {
        let p = s.as_path().unwrap().to_path_buf();
        assert!(p.exists());
        seen.push(p);
        if seen.len() == 3 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "bad record"));
        }
        Ok(vec![()])
    })
    .unwrap_err();

    let inner = err.into_reader().unwrap();
    assert_eq!(inner.kind(), io::ErrorKind::InvalidData);
    assert_eq!(inner.to_string(), "bad record");
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|p| !p.exists()));
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn missing_file_is_reported() {
    let fx = Fixture::new();
    let path = fx.input.path().join("nope.mseed");

    let mut rec = Recorder::default();
    let err = run(Source::Path(path.clone()), &(), &fx.options(), |s, _| rec.read(s)).unwrap_err();
    assert!(matches!(err, DispatchError::NotFound { path: ref p } if *p == path));
    assert!(rec.paths.is_empty());
}

#[test]
fn disabled_sniffing_calls_directly_each_time() {
    let fx = Fixture::new();
    let path = fx.write("trace.gz", &gzip(b"packed"));

    let mut seen: Vec<(PathBuf, Kwargs)> = Vec::new();
    let mut read = uncompress_kwargs(fx.options(), |s: Source<()>, kw: &Kwargs| {
        seen.push((s.as_path().unwrap().to_path_buf(), kw.clone()));
        Ok::<_, io::Error>(())
    });
    for _ in 0..2 {
        let args = kwargs(json!({"format": "MSEED", "check_compression": false}));
        read(Source::Path(path.clone()), args).unwrap();
    }
    drop(read);

    assert_eq!(seen.len(), 2);
    for (p, kw) in &seen {
        assert_eq!(p, &path);
        assert_eq!(kw, &kwargs(json!({"format": "MSEED"})));
    }
    assert_eq!(fx.leftover_temps(), 0);
}

#[test]
fn invalid_flag_is_rejected_before_reading() {
    let fx = Fixture::new();
    let path = fx.write("trace.txt", b"x");

    let mut called = false;
    let mut read = uncompress_kwargs(fx.options(), |_: Source<()>, _: &Kwargs| {
        called = true;
        Ok::<_, io::Error>(())
    });
    let err = read(Source::Path(path), kwargs(json!({"check_compression": 0}))).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidOption(_)));
    drop(read);
    assert!(!called);
}

#[test]
fn wrapped_reader_is_reusable() {
    let fx = Fixture::new();
    let gz = fx.write("a.gz", &gzip(b"from gz"));
    let plain = fx.write("b.txt", b"from plain");

    let mut read = uncompress(fx.options(), |s: Source<()>, _: &()| {
        std::fs::read_to_string(s.as_path().unwrap())
    });
    assert_eq!(read(Source::Path(gz), &()).unwrap(), "from gz");
    assert_eq!(read(Source::Path(plain), &()).unwrap(), "from plain");
}

#[test]
fn remap_conflict_names_keys() {
    let table = RenameTable::new().rename("a", "x").rename("b", "x");
    let input = kwargs(json!({"a": 1, "b": 2}));

    let err = remap(&input, &table).unwrap_err();
    let RemapError::Conflict { old_keys, new_key } = &err;
    assert_eq!(old_keys, &["a", "b"]);
    assert_eq!(new_key, "x");
    assert!(err.to_string().contains("(a, b)"));
    assert_eq!(input, kwargs(json!({"a": 1, "b": 2})));
}

#[test]
fn remap_drop_only() {
    let table = RenameTable::new().discard("a");
    let (out, actions) = remap(&kwargs(json!({"a": 1})), &table).unwrap();
    assert!(out.is_empty());
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].message("f"), "Deprecated keyword a in f() call - ignoring.");
}
