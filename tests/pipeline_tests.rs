// End-to-end checks of the corpus → batch pipeline on real files.

use std::fs;
use std::path::Path;

use corpus_batcher::data::scanner::scan_files;
use corpus_batcher::infra::curves::{read_curves, CurveLog};
use corpus_batcher::infra::figure::plot_figure;
use corpus_batcher::{
    BatchStream, CorpusReader, InputOutputPairs, PipelineConfig, PipelineError, RemainderPolicy,
    TokenEncoder, Vocabulary,
};

fn write_corpus(dir: &Path) {
    fs::write(dir.join("1.txt"), "a b\n\nc d e").unwrap();
    fs::write(dir.join("2.txt"), "f g").unwrap();
}

fn letters() -> Vocabulary {
    Vocabulary::from_words(["a", "b", "c", "d", "e", "f", "g"]).unwrap()
}

fn config(batch_samples: usize) -> PipelineConfig {
    PipelineConfig { batch_samples, ..PipelineConfig::default() }
}

#[test]
fn scanner_lists_exactly_the_regular_files() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("3.txt"), "x y").unwrap();

    let mut names: Vec<String> = scan_files(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["1.txt", "2.txt"]);
}

#[test]
fn pairs_from_disk_match_worked_example() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let reader = CorpusReader::new(dir.path(), "utf-8").unwrap();
    let vocab  = letters();

    let mut pairs: Vec<Vec<u32>> = InputOutputPairs::new(&reader, &vocab)
        .unwrap()
        .map(|p| p.unwrap().tokens().to_vec())
        .collect();
    // Directory order is not guaranteed; compare as a set
    pairs.sort();
    assert_eq!(pairs, vec![vec![1, 2], vec![3, 4], vec![3, 4, 5], vec![6, 7]]);
}

#[test]
fn batch_of_four_covers_the_whole_corpus() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let reader = CorpusReader::new(dir.path(), "utf-8").unwrap();
    let vocab  = letters();

    let mut stream = BatchStream::new(&reader, &vocab, vocab.vocab_size(), 4, config(4)).unwrap();
    let batch = stream.next().unwrap().unwrap();

    assert_eq!(batch.inputs.shape(), &[4, 2]);
    assert_eq!(batch.targets.shape(), &[4, 8]);

    let mut rows: Vec<(Vec<u32>, usize)> = batch
        .inputs
        .rows()
        .into_iter()
        .map(|r| r.to_vec())
        .zip(batch.target_indices())
        .collect();
    rows.sort();
    assert_eq!(
        rows,
        vec![
            (vec![0, 1], 2),
            (vec![0, 3], 4),
            (vec![0, 6], 7),
            (vec![3, 4], 5),
        ]
    );
    for row in batch.targets.rows() {
        assert_eq!(row.sum(), 1.0);
    }
}

#[test]
fn stream_keeps_cycling_over_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let reader = CorpusReader::new(dir.path(), "utf-8").unwrap();
    let vocab  = letters();

    let stream = BatchStream::new(&reader, &vocab, vocab.vocab_size(), 4, config(3)).unwrap();
    let batches: Vec<_> = stream.take(4).map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 4);
    assert!(batches.iter().all(|b| b.len() == 3));
}

#[test]
fn carried_remainder_fills_the_next_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let reader = CorpusReader::new(dir.path(), "utf-8").unwrap();
    let vocab  = letters();
    let cfg    = PipelineConfig { remainder: RemainderPolicy::Carry, ..config(3) };

    let mut stream = BatchStream::new(&reader, &vocab, vocab.vocab_size(), 4, cfg).unwrap();
    for _ in 0..4 {
        assert_eq!(stream.next().unwrap().unwrap().len(), 3);
    }
    // 12 pairs drawn from 3 passes of 4
    assert_eq!(stream.passes(), 3);
}

#[test]
fn memory_ceiling_stops_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    let reader = CorpusReader::new(dir.path(), "utf-8").unwrap();
    let vocab  = letters();
    let cfg    = PipelineConfig { y_memory_threshold_gb: 1e-9, ..config(2) };

    let mut stream = BatchStream::new(&reader, &vocab, vocab.vocab_size(), 4, cfg).unwrap();
    let err = stream.next().unwrap().unwrap_err();
    assert!(matches!(err, PipelineError::ResourceBudgetExceeded { .. }));
    assert!(stream.next().is_none());
}

#[test]
fn fitted_vocabulary_ranks_by_frequency() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1.txt"), "The cat\n\nthe dog the END").unwrap();
    let reader = CorpusReader::new(dir.path(), "utf-8").unwrap();

    let vocab = Vocabulary::fit_source(&reader).unwrap();
    assert_eq!(vocab.index_of("the"), Some(1));
    assert_eq!(vocab.encode("the unknown cat").unwrap(), vec![1, 2]);
    assert_eq!(vocab.vocab_size(), 4);
}

#[test]
fn logged_curves_are_plotted() {
    let dir = tempfile::tempdir().unwrap();
    let log = CurveLog::new(dir.path().join("loss.csv"), &["epoch", "train", "val"]).unwrap();
    for epoch in 0..5 {
        let e = epoch as f64;
        log.append(e, &[1.0 / (e + 1.0), 1.2 / (e + 1.0)]).unwrap();
    }

    let curves = read_curves(log.csv_path()).unwrap();
    assert_eq!(curves.len(), 2);

    let figure = plot_figure(dir.path().join("figures"), "loss", &curves).unwrap();
    assert!(figure.unwrap().exists());
}
