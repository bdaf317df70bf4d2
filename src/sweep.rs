//! Parameter sweep over the lookup executable.
//!
//! Every input file is run against every query tree, and every query tree
//! against its own block of thresholds. A task that fails is recorded and the
//! sweep moves on; only an inconsistent plan stops it.

use super::errors::*;
use super::launcher::Launch;
use super::schema::describe_selector;
use std::fmt;

/// One invocation of the lookup executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepTask {
    /// Collection file to search.
    pub input: String,

    /// Similarity threshold.
    pub threshold: i64,

    /// File the executable writes its measurements to.
    pub output: String,

    /// Query tree index.
    pub query_tree: i64,

    /// Algorithm selector.
    pub algorithm: i32,
}

impl SweepTask {
    /// Command line of the task:
    /// `exe inputfile threshold outputfile querytree algorithm`.
    pub fn args(&self, executable: &str) -> Vec<String> {
        vec![
            executable.to_string(),
            self.input.clone(),
            self.threshold.to_string(),
            self.output.clone(),
            self.query_tree.to_string(),
            self.algorithm.to_string(),
        ]
    }
}

impl fmt::Display for SweepTask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}, t={}, q={}, a={} -> {}]",
            self.input, self.threshold, self.query_tree, self.algorithm, self.output
        )
    }
}

/// What became of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Exited successfully; captured stdout.
    Completed(Vec<u8>),

    /// Could not be started or exited unsuccessfully.
    Failed(String),

    /// Ran past its budget and was killed.
    TimedOut,

    /// Not run (dry run).
    Skipped,
}

/// The whole parameter space of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    /// Path of the lookup executable.
    pub executable: String,

    /// Input files, parallel to `outputs`.
    pub inputs: Vec<String>,

    /// Output files, parallel to `inputs`.
    pub outputs: Vec<String>,

    /// Flat list of thresholds, `per_tree` for each query tree in order.
    pub thresholds: Vec<i64>,

    /// Query tree indices.
    pub query_trees: Vec<i64>,

    /// Algorithm selector passed to every run.
    pub algorithm: i32,

    /// Thresholds per query tree.
    pub per_tree: usize,
}

impl SweepPlan {
    /// Checks that the lists fit together.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.len() != self.outputs.len() {
            bail!(ErrorKind::Misconfigured(format!(
                "{} input files but {} output files",
                self.inputs.len(),
                self.outputs.len()
            )));
        }
        if self.per_tree == 0 {
            bail!(ErrorKind::Misconfigured(
                "thresholds per query tree must be positive".to_string()
            ));
        }
        let needed = self.per_tree * self.query_trees.len();
        if self.thresholds.len() < needed {
            bail!(ErrorKind::Misconfigured(format!(
                "{} query trees need {} thresholds, got {}",
                self.query_trees.len(),
                needed,
                self.thresholds.len()
            )));
        }
        if self.thresholds.len() > needed {
            warn!(
                "ignoring {} surplus thresholds: {:?}",
                self.thresholds.len() - needed,
                &self.thresholds[needed..]
            );
        }
        if describe_selector(self.algorithm).is_none() {
            warn!("unknown algorithm selector {}, passing it on", self.algorithm);
        }
        Ok(())
    }

    /// Thresholds of the query tree at `position` in `query_trees`.
    pub fn block(&self, position: usize) -> &[i64] {
        let start = position * self.per_tree;
        &self.thresholds[start..start + self.per_tree]
    }

    /// All tasks in execution order: input file, then query tree, then
    /// threshold.
    pub fn tasks(&self) -> Result<Vec<SweepTask>> {
        self.validate()?;
        let mut tasks = Vec::new();
        for (input, output) in self.inputs.iter().zip(&self.outputs) {
            for (position, &query_tree) in self.query_trees.iter().enumerate() {
                for &threshold in self.block(position) {
                    tasks.push(SweepTask {
                        input: input.clone(),
                        threshold: threshold,
                        output: output.clone(),
                        query_tree: query_tree,
                        algorithm: self.algorithm,
                    });
                }
            }
        }
        Ok(tasks)
    }
}

/// Tasks of a sweep with their outcomes, in execution order.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Every task and what became of it.
    pub outcomes: Vec<(SweepTask, TaskOutcome)>,
}

impl SweepReport {
    fn count<F: Fn(&TaskOutcome) -> bool>(&self, f: F) -> usize {
        self.outcomes.iter().filter(|&&(_, ref o)| f(o)).count()
    }

    /// Tasks that exited successfully.
    pub fn completed(&self) -> usize {
        self.count(|o| match *o {
            TaskOutcome::Completed(_) => true,
            _ => false,
        })
    }

    /// Tasks that could not be run or exited unsuccessfully.
    pub fn failed(&self) -> usize {
        self.count(|o| match *o {
            TaskOutcome::Failed(_) => true,
            _ => false,
        })
    }

    /// Tasks that were killed.
    pub fn timed_out(&self) -> usize {
        self.count(|o| *o == TaskOutcome::TimedOut)
    }

    /// Tasks that were not run.
    pub fn skipped(&self) -> usize {
        self.count(|o| *o == TaskOutcome::Skipped)
    }

    /// Whether every task that ran completed.
    pub fn all_completed(&self) -> bool {
        self.failed() == 0 && self.timed_out() == 0
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} tasks: {} completed, {} failed, {} timed out, {} skipped",
            self.outcomes.len(),
            self.completed(),
            self.failed(),
            self.timed_out(),
            self.skipped()
        )
    }
}

/// Runs every task of `plan` with `launcher`. Errors only on an inconsistent
/// plan; failing tasks are logged and reported.
pub fn run_sweep<L: Launch>(plan: &SweepPlan, launcher: &mut L, dry_run: bool) -> Result<SweepReport> {
    let tasks = plan.tasks()?;
    info!(
        "{} tasks ({} files x {} query trees x {} thresholds)",
        tasks.len(),
        plan.inputs.len(),
        plan.query_trees.len(),
        plan.per_tree
    );

    let mut report = SweepReport::default();
    for task in tasks {
        let args = task.args(&plan.executable);
        info!("{:?}", args);
        if dry_run {
            report.outcomes.push((task, TaskOutcome::Skipped));
            continue;
        }

        let outcome = match launcher.launch(&args) {
            Ok(stdout) => {
                debug!("{}: {} bytes of output", task, stdout.len());
                trace!("{}", String::from_utf8_lossy(&stdout));
                TaskOutcome::Completed(stdout)
            }
            Err(Error(ErrorKind::Timeout(secs), _)) => {
                error!("Execution failed. {}: timed out after {} s", task, secs);
                TaskOutcome::TimedOut
            }
            Err(e) => {
                error!("Execution failed. {}: {}", task, e);
                TaskOutcome::Failed(e.to_string())
            }
        };
        report.outcomes.push((task, outcome));
    }

    info!("{}", report);
    Ok(report)
}
