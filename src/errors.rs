//! Error types for the experiment tooling.

/// Creates the Error, ErrorKind, ResultExt, and Result types
error_chain! {
    errors {
        /// A result file name that cannot be parsed.
        MalformedResultName(name: String) {
            description("result file name does not follow the naming convention")
            display("malformed result file name '{}', expected <dataset>-<threshold>-<querytree>-runtime.txt", name)
        }
        /// The executable could not be started.
        Launch(cmd: String) {
            description("failed to launch the executable")
            display("failed to launch '{}'", cmd)
        }
        /// The executable exited unsuccessfully.
        ExitStatus(code: Option<i32>) {
            description("executable exited unsuccessfully")
            display("executable exited with {}", match *code {
                Some(c) => format!("code {}", c),
                None => "a signal".to_string(),
            })
        }
        /// The executable ran past its budget.
        Timeout(secs: u64) {
            description("executable exceeded its time budget")
            display("executable did not finish within {} s", secs)
        }
        /// Inconsistent sweep parameters.
        Misconfigured(t: String) {
            description("inconsistent sweep configuration")
            display("misconfigured sweep: {}", t)
        }
        /// No file of a result group could be loaded.
        EmptyGroup(dataset: String, query_tree: u32) {
            description("no result file of a group could be loaded")
            display("no loadable result for dataset '{}', query tree {}", dataset, query_tree)
        }
        /// A column missing from a result table.
        UnknownColumn(name: String) {
            description("column not present in the result table")
            display("no column named '{}'", name)
        }
        /// A colour or marker that cannot be parsed.
        InvalidStyle(t: String) {
            description("invalid chart style")
            display("invalid style: {}", t)
        }
        /// A plotting backend failure.
        Render(t: String) {
            description("chart rendering failed")
            display("rendering failed: {}", t)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Toml(::toml::de::Error);
        Pattern(::glob::PatternError);
        Glob(::glob::GlobError);
        ParseInt(::std::num::ParseIntError);
        ParseFloat(::std::num::ParseFloatError);
    }
}
