use crate::features::smartctl::models::Device;
use crate::shared::error::CollectionError;
use crate::shared::traits::CommandExecutor;
use log::debug;

pub const SCAN_ARG: &str = "--scan";

pub struct DeviceScanner<'a, E: CommandExecutor> {
    executor: &'a E,
}

impl<'a, E: CommandExecutor> DeviceScanner<'a, E> {
    pub fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Runs `smartctl --scan` and returns the device of every non-blank line, in order.
    pub fn scan(&self) -> Result<Vec<Device>, CollectionError> {
        let lines = self.executor.run(&[SCAN_ARG])?;
        let devices = parse_scan_output(&lines);
        debug!("Scan found {} devices", devices.len());
        Ok(devices)
    }
}

pub fn parse_scan_output<S: AsRef<str>>(lines: &[S]) -> Vec<Device> {
    lines
        .iter()
        .filter_map(|line| line.as_ref().split_whitespace().next())
        .map(Device::new)
        .collect()
}
