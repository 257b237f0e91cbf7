//! Tab-separated reports written by the subcommands.

use std::io;

use banister_model::{
    DesignVar,
    io::{real, tsv_writer},
    objective::TrainingScores,
};
use banister_stats::summary::FitnessSummary;

/// Writes parameter designs with their mean absolute residuals.
pub fn write_estimates<'a, W, I>(writer: W, rows: I) -> io::Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = (&'a [f64], f64)>,
{
    let mut writer = tsv_writer(writer);
    let header = DesignVar::ALL.map(DesignVar::name);
    writer.write_record(header.iter().chain(&["mean_abs_residual"]))?;
    for (design, mean_abs_residual) in rows {
        let values = design.iter().copied().chain([mean_abs_residual]);
        writer.write_record(values.map(real))?;
    }
    writer.flush()
}

/// Writes training plans with their scores and fitness.
pub fn write_plans<'a, W, I>(writer: W, num_days: usize, rows: I) -> io::Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = (&'a [f64], &'a TrainingScores, f64)>,
{
    let mut writer = tsv_writer(writer);
    let days = (0..num_days).map(|day| format!("day{day:03}"));
    let scores = ["final_performance", "penalty", "roughness", "fitness"];
    writer.write_record(days.chain(scores.map(str::to_owned)))?;
    for (stresses, scores, fitness) in rows {
        let totals = [
            scores.final_performance,
            scores.penalty,
            scores.roughness,
            fitness,
        ];
        writer.write_record(stresses.iter().copied().chain(totals).map(real))?;
    }
    writer.flush()
}

/// Writes one fitness summary per generation, numbered from 1.
pub fn write_convergence<W>(writer: W, history: &[FitnessSummary]) -> io::Result<()>
where
    W: io::Write,
{
    let mut writer = tsv_writer(writer);
    writer.write_record(["generation"].iter().chain(&FitnessSummary::COLUMNS))?;
    for (i, summary) in history.iter().enumerate() {
        let generation = (i + 1).to_string();
        let values = summary.as_array().map(real);
        writer.write_record([generation].into_iter().chain(values))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_write_estimates() {
        let design = [40.0, 8.0, 1.0, 1.0, 0.08, 0.2, 250.0, 10.0, 5.0];
        let mut out = vec![];
        write_estimates(&mut out, [(&design[..], 1.5)]).unwrap();
        assert_eq!(
            text(out),
            "tau1\ttau2\talpha\tbeta\tk1\tk2\tp0\tf0\tu0\tmean_abs_residual\n\
             40.000000\t8.000000\t1.000000\t1.000000\t0.080000\t0.200000\t\
             250.000000\t10.000000\t5.000000\t1.500000\n"
        );
    }

    #[test]
    fn test_write_plans() {
        let scores = TrainingScores {
            final_performance: 300.0,
            penalty: 2.0,
            roughness: 0.0,
        };
        let mut out = vec![];
        write_plans(&mut out, 2, [(&[10.0, 20.5][..], &scores, 299.5)]).unwrap();
        assert_eq!(
            text(out),
            "day000\tday001\tfinal_performance\tpenalty\troughness\tfitness\n\
             10.000000\t20.500000\t300.000000\t2.000000\t0.000000\t299.500000\n"
        );
    }

    #[test]
    fn test_write_plans_worst_scores() {
        let mut out = vec![];
        write_plans(
            &mut out,
            1,
            [(&[0.0][..], &TrainingScores::WORST, f64::NEG_INFINITY)],
        )
        .unwrap();
        assert!(text(out).ends_with("0.000000\t-inf\tinf\tinf\t-inf\n"));
    }

    #[test]
    fn test_write_plans_rejects_wrong_length() {
        let scores = TrainingScores {
            final_performance: 300.0,
            penalty: 0.0,
            roughness: 0.0,
        };
        let mut out = vec![];
        let result = write_plans(&mut out, 3, [(&[10.0][..], &scores, 300.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_convergence() {
        let history = [
            FitnessSummary::new(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            FitnessSummary::new(&[2.0]),
        ];
        let mut out = vec![];
        write_convergence(&mut out, &history).unwrap();
        assert_eq!(
            text(out),
            "generation\tmin\tq1\tmedian\tq3\tmax\n\
             1\t1.000000\t2.000000\t3.000000\t4.000000\t5.000000\n\
             2\t2.000000\t2.000000\t2.000000\t2.000000\t2.000000\n"
        );
    }
}
