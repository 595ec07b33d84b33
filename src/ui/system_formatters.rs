use crate::core::system_monitor::{MetricCategory, Snapshot};
use crate::ui::formatters::{format_bytes, format_time};
use colored::*;

/// A titled group of display lines for one metric category.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<String>,
}

/// Display lines for every category of a snapshot, in display order.
pub fn snapshot_sections(snapshot: &Snapshot) -> Vec<Section> {
    vec![
        Section {
            title: "CPU",
            lines: vec![match snapshot.cpu {
                Some(cpu) => format!("CPU Usage: {:.1}%", cpu.percent),
                None => unavailable_line("CPU Usage", snapshot, MetricCategory::Cpu),
            }],
        },
        Section {
            title: "Memory",
            lines: vec![match snapshot.memory {
                Some(mem) => format!(
                    "Memory Usage: {} / {} ({:.1}%)",
                    format_bytes(mem.used),
                    format_bytes(mem.total),
                    mem.percent
                ),
                None => unavailable_line("Memory Usage", snapshot, MetricCategory::Memory),
            }],
        },
        Section {
            title: "Disk",
            lines: match &snapshot.disks {
                Some(disks) if disks.is_empty() => vec!["No readable partitions".to_string()],
                Some(disks) => disks
                    .iter()
                    .map(|d| {
                        format!(
                            "{} - Disk Usage: {} / {} ({:.1}%)",
                            d.device,
                            format_bytes(d.used),
                            format_bytes(d.total),
                            d.percent
                        )
                    })
                    .collect(),
                None => vec![unavailable_line("Disk Usage", snapshot, MetricCategory::Disk)],
            },
        },
        Section {
            title: "Network",
            lines: match snapshot.network {
                Some(net) => vec![
                    format!("Total Network Sent: {}", format_bytes(net.bytes_sent)),
                    format!("Total Network Received: {}", format_bytes(net.bytes_received)),
                ],
                None => vec![unavailable_line("Network", snapshot, MetricCategory::Network)],
            },
        },
        Section {
            title: "Temperature",
            lines: vec![match snapshot.temperature.celsius() {
                Some(c) => format!("CPU Temperature: {:.1}°C", c),
                None => "CPU Temperature: N/A".to_string(),
            }],
        },
        Section {
            title: "Processes",
            lines: match &snapshot.processes {
                Some(procs) => procs
                    .iter()
                    .map(|p| {
                        format!(
                            "PID: {} | Name: {} | CPU: {:.1}% | Memory: {:.1}%",
                            p.pid, p.name, p.cpu_percent, p.memory_percent
                        )
                    })
                    .collect(),
                None => vec![unavailable_line("Processes", snapshot, MetricCategory::Process)],
            },
        },
        Section {
            title: "System Info",
            lines: vec![
                format!(
                    "System: {} {}",
                    snapshot.system.os_name, snapshot.system.os_release
                ),
                format!("Architecture: {}", snapshot.system.architecture),
                format!("Kernel Version: {}", snapshot.system.kernel_version),
            ],
        },
    ]
}

fn unavailable_line(label: &str, snapshot: &Snapshot, category: MetricCategory) -> String {
    match snapshot.failure(category) {
        Some(failure) => format!("{}: N/A ({})", label, failure.message),
        None => format!("{}: N/A", label),
    }
}

/// Print a snapshot to stdout
pub fn print_snapshot(snapshot: &Snapshot) {
    println!(
        "\n{} {}",
        "SYSTEM MONITOR".bold().bright_cyan(),
        format_time(&snapshot.timestamp).dimmed()
    );
    println!("{}", "=".repeat(80));

    for section in snapshot_sections(snapshot) {
        println!("\n{}", section.title.bold().white());
        for line in &section.lines {
            println!("  {}", line.purple());
        }
    }
    println!();
}
