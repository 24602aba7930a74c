use crate::shared::error::CollectionError;
use crate::shared::traits::CommandExecutor;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for smartctl keyed by argument list.
#[derive(Default)]
pub struct FakeExecutor {
    responses: HashMap<Vec<String>, Result<String, String>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, args: &[&str], stdout: &str) -> Self {
        self.responses.insert(to_key(args), Ok(stdout.to_string()));
        self
    }

    pub fn with_error(mut self, args: &[&str], reason: &str) -> Self {
        self.responses.insert(to_key(args), Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandExecutor for FakeExecutor {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, CollectionError> {
        let key = to_key(args);
        self.calls.lock().unwrap().push(key.clone());
        match self.responses.get(&key) {
            Some(Ok(stdout)) => Ok(stdout.lines().map(str::to_string).collect()),
            Some(Err(reason)) => Err(CollectionError::Execution {
                command: key.join(" "),
                reason: reason.clone(),
            }),
            None => Err(CollectionError::Execution {
                command: key.join(" "),
                reason: "unexpected invocation".to_string(),
            }),
        }
    }
}

fn to_key(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

/// Builds `smartctl --attributes` output: 7 header lines, the rows, one blank line.
pub fn attribute_report(rows: &[&str]) -> String {
    let mut report = String::from(
        "smartctl 7.3 2022-02-28 r5338 [x86_64-linux-6.1.0] (local build)\n\
         Copyright (C) 2002-22, Bruce Allen, Christian Franke, www.smartmontools.org\n\
         \n\
         === START OF READ SMART DATA SECTION ===\n\
         SMART Attributes Data Structure revision number: 16\n\
         Vendor Specific SMART Attributes with Thresholds:\n\
         ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE\n",
    );
    for row in rows {
        report.push_str(row);
        report.push('\n');
    }
    report.push('\n');
    report
}

pub const RAW_READ_ERROR_RATE: &str =
    "  1 Raw_Read_Error_Rate     0x000f   200   200   051    Pre-fail  Always       -       51";
pub const POWER_ON_HOURS: &str =
    "  9 Power_On_Hours          0x0032   092   092   000    Old_age   Always       -       7251";
pub const TEMPERATURE: &str =
    "194 Temperature_Celsius     0x0022   114   098   000    Old_age   Always       -       36 (Min/Max 20/45)";

pub const UNSUPPORTED_REPORT: &str = "smartctl 7.3 2022-02-28 r5338 [x86_64-linux-6.1.0] (local build)\n\
Copyright (C) 2002-22, Bruce Allen, Christian Franke, www.smartmontools.org\n\
\n\
/dev/sdb: Unknown USB bridge [0x0bc2:0x231a (0x100)]\n\
Please specify device type with the -d option.\n\
\n\
Use smartctl -h to get a usage summary\n\
\n\
SMART support is: Unavailable - device lacks SMART capability.\n\
\n";
