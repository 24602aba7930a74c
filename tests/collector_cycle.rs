use blackbird_smartctl::{
    parse_attribute_report, CollectionError, CommandExecutor, Device, DeviceScanner,
    DiscoveryEntry, Framing, ParsePolicy, QueueItem, SmartctlCollector, SmartctlConfig,
};
use std::collections::HashMap;
use tokio::sync::mpsc::{channel, Receiver};

struct CannedSmartctl {
    outputs: HashMap<String, String>,
}

impl CannedSmartctl {
    fn new(outputs: &[(&str, String)]) -> Self {
        Self {
            outputs: outputs
                .iter()
                .map(|(args, out)| (args.to_string(), out.clone()))
                .collect(),
        }
    }
}

impl CommandExecutor for CannedSmartctl {
    fn run(&self, args: &[&str]) -> Result<Vec<String>, CollectionError> {
        let key = args.join(" ");
        self.outputs
            .get(&key)
            .map(|out| out.lines().map(str::to_string).collect())
            .ok_or(CollectionError::Execution {
                command: key,
                reason: "no such device".to_string(),
            })
    }
}

fn report(rows: &[&str]) -> String {
    let mut out: String = (1..=7).map(|i| format!("header line {}\n", i)).collect();
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out.push('\n');
    out
}

fn config() -> SmartctlConfig {
    SmartctlConfig {
        hostname: "storage-1".to_string(),
        ..SmartctlConfig::default()
    }
}

fn drain(rx: &mut Receiver<QueueItem>) -> Vec<QueueItem> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}

#[test]
fn scan_and_attribute_example() {
    let smartctl = CannedSmartctl::new(&[
        ("--scan", "/dev/sda TYPE\n".to_string()),
        (
            "--attributes /dev/sda",
            report(&["  1 Raw_Read_Error_Rate 0x000f 100 100 0 Pre-fail Always PASS 51"]),
        ),
    ]);

    let devices = DeviceScanner::new(&smartctl).scan().unwrap();
    assert_eq!(devices, vec![Device::new("/dev/sda")]);

    let lines: Vec<String> = report(&["  1 Raw_Read_Error_Rate 0x000f 100 100 0 Pre-fail Always PASS 51"])
        .lines()
        .map(str::to_string)
        .collect();
    let attributes =
        parse_attribute_report(&devices[0], &lines, Framing::Fixed, ParsePolicy::Strict).unwrap();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes["Raw_Read_Error_Rate"].raw_value, 51);
    assert_eq!(attributes["Raw_Read_Error_Rate"].when_failed, "PASS");
}

#[test]
fn metric_and_discovery_passes_cover_every_attribute() {
    let rows = [
        "  1 Attr1 0x000f 100 100 0 Pre-fail Always - 10",
        "  2 Attr2 0x000f 100 100 0 Pre-fail Always FAILING_NOW 20",
    ];
    let smartctl = CannedSmartctl::new(&[
        ("--scan", "/dev/sda -d sat\n/dev/sdb -d sat\n".to_string()),
        ("--attributes /dev/sda", report(&rows)),
        ("--attributes /dev/sdb", report(&[])),
    ]);
    let (tx, mut rx) = channel(64);
    let collector = SmartctlCollector::with_executor(config(), smartctl, tx);

    let cycle = collector.build_items().unwrap();
    assert_eq!(cycle.unsupported, 1);
    assert_eq!(drain(&mut rx).len(), 2 + 2 * rows.len());

    collector.build_discovery_items().unwrap();
    let discovery = drain(&mut rx);
    assert_eq!(discovery.len(), 1);
    match &discovery[0] {
        QueueItem::Discovery(item) => {
            assert_eq!(item.host, "storage-1");
            assert_eq!(
                item.value,
                vec![
                    DiscoveryEntry::new("/dev/sda", "Attr1"),
                    DiscoveryEntry::new("/dev/sda", "Attr2"),
                ]
            );
        }
        other => panic!("expected discovery item, got {other:?}"),
    }
}

#[test]
fn lenient_parsing_keeps_well_formed_rows() {
    let smartctl = CannedSmartctl::new(&[
        ("--scan", "/dev/sda\n".to_string()),
        (
            "--attributes /dev/sda",
            report(&[
                "  1 Attr1 0x000f 100 100 0 Pre-fail Always - 10",
                "  2 Attr2 0x000f",
            ]),
        ),
    ]);
    let (tx, mut rx) = channel(64);

    let strict = SmartctlCollector::with_executor(config(), &smartctl, tx.clone());
    assert!(matches!(strict.build_items(), Err(CollectionError::Parse { .. })));
    drain(&mut rx);

    let lenient_config = SmartctlConfig {
        parse_policy: ParsePolicy::Lenient,
        ..config()
    };
    let lenient = SmartctlCollector::with_executor(lenient_config, &smartctl, tx);
    let cycle = lenient.build_items().unwrap();
    assert_eq!(cycle.enqueued, 2 + 2);
}
