use anyhow::Result;
use ironreduce::reducers::{Count, Indexer};
use ironreduce::testing::*;
use ironreduce::{
    ExecMode, JobSpec, NumericKeyOrder, ReduceError, do_reduce_with_order,
    read_partition_results, run_job,
};
use std::fs;

fn seed(dir: &JobDir, sources: usize, partitions: usize) -> Result<()> {
    for m in 0..sources {
        for r in 0..partitions {
            let records: Vec<_> = (0..30)
                .map(|i| kv(&((i * (r + 1)) % 11).to_string(), &format!("m{m}")))
                .collect();
            dir.write_source(m, r, &records)?;
        }
    }
    Ok(())
}

#[test]
fn sequential_runs_every_partition() -> Result<()> {
    let dir = JobDir::new("job")?;
    seed(&dir, 3, 4)?;
    let spec = JobSpec::new("job", 3, 4)
        .with_input_dir(dir.path())
        .with_output_dir(dir.path().join("res"));

    let report = run_job(&spec, &NumericKeyOrder, &Count, ExecMode::Sequential)?;
    assert!(report.is_success());
    let summaries = report.into_result()?;
    assert_eq!(summaries.len(), 4);
    for (r, s) in summaries.iter().enumerate() {
        assert_eq!(s.partition, r);
        assert_eq!(s.input_records, 90);
        assert!(s.output.ends_with(format!("mrtmp.job-res-{r}")));
    }
    Ok(())
}

#[test]
fn parallel_matches_sequential_bytes() -> Result<()> {
    let dir = JobDir::new("par")?;
    seed(&dir, 5, 6)?;
    let seq = JobSpec::new("par", 5, 6)
        .with_input_dir(dir.path())
        .with_output_dir(dir.path().join("seq"));
    let par = seq.clone().with_output_dir(dir.path().join("par"));

    run_job(&seq, &NumericKeyOrder, &Indexer, ExecMode::Sequential)?.into_result()?;
    run_job(&par, &NumericKeyOrder, &Indexer, ExecMode::Parallel { threads: Some(3) })?
        .into_result()?;

    for r in 0..6 {
        assert_eq!(fs::read(seq.result_path(r))?, fs::read(par.result_path(r))?);
    }
    Ok(())
}

#[test]
fn one_failing_partition_does_not_hide_the_rest() -> Result<()> {
    let dir = JobDir::new("holes")?;
    seed(&dir, 2, 3)?;
    fs::remove_file(dir.source_path(1, 1))?;
    let spec = JobSpec::new("holes", 2, 3)
        .with_input_dir(dir.path())
        .with_output_dir(dir.path().join("res"));

    let report = run_job(&spec, &NumericKeyOrder, &Count, ExecMode::Parallel { threads: None })?;
    assert!(!report.is_success());

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, 1);
    assert!(matches!(failures[0].1, ReduceError::MissingSource { source_index: 1, .. }));

    assert!(report.results[0].is_ok());
    assert!(report.results[2].is_ok());
    assert!(!spec.result_path(1).exists());
    Ok(())
}

#[test]
fn results_read_back_with_the_merger_format() -> Result<()> {
    let dir = JobDir::new("sym")?;
    for (m, records) in split_sources().iter().enumerate() {
        dir.write_source(m, 0, records)?;
    }
    let spec = JobSpec::new("sym", 3, 1)
        .with_input_dir(dir.path())
        .with_output_dir(dir.path());
    run_job(&spec, &NumericKeyOrder, &Count, ExecMode::Sequential)?.into_result()?;

    let back = read_partition_results(&spec, 0)?;
    assert_eq!(back, vec![kv("1", "3"), kv("2", "2")]);

    // A result file is itself a valid single source for another reduce.
    fs::rename(spec.result_path(0), dir.source_path(0, 9))?;
    let again = JobSpec::new("sym", 1, 10)
        .with_input_dir(dir.path())
        .with_output_dir(dir.path().join("again"));
    let summary = do_reduce_with_order(&again.task(9), dir.path(), &NumericKeyOrder, &Count)?;
    assert_eq!(summary.output_records, 2);
    Ok(())
}

#[test]
fn missing_result_file_is_reported() -> Result<()> {
    let dir = JobDir::new("none")?;
    let spec = JobSpec::new("none", 1, 3).with_output_dir(dir.path());
    let err = read_partition_results(&spec, 2).unwrap_err();
    match &err {
        ReduceError::MissingResult {
            partition, path, ..
        } => {
            assert_eq!(*partition, 2);
            assert!(path.ends_with("mrtmp.none-res-2"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("partition 2"), "{err}");
    Ok(())
}
