/*!
 * Paging Kernel - Interactive Console
 *
 * Line-oriented front end over the kernel: create and kill processes,
 * single-step the scheduler, or let the background driver run.
 */

use anyhow::{anyhow, bail, Context};
use paging_kernel::core::limits::DEFAULT_PRIORITY;
use paging_kernel::{init_tracing, DriverHandle, Kernel, KernelConfig, StepReport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

const HELP: &str = "commands: create <name> <size> [priority] [critical:0/1], kill <pid>, \
block <pid>, unblock <pid>, priority <pid> <n>, step, run, stop, inspect, view, exit";

/// Parsed console command
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Create {
        name: String,
        size: usize,
        priority: i32,
        critical: bool,
    },
    Kill(u32),
    Block(u32),
    Unblock(u32),
    Priority(u32, i32),
    Step,
    Run,
    Stop,
    Inspect,
    Exit,
}

fn arg<'a>(parts: &[&'a str], i: usize, what: &str) -> anyhow::Result<&'a str> {
    parts
        .get(i)
        .copied()
        .ok_or_else(|| anyhow!("missing {}", what))
}

fn pid_arg(parts: &[&str], i: usize) -> anyhow::Result<u32> {
    arg(parts, i, "<pid>")?
        .parse::<u32>()
        .context("pid must be a positive integer")
}

fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = parts.first() else {
        return Ok(None);
    };

    let command = match first.to_lowercase().as_str() {
        "help" => Command::Help,
        "create" => {
            if parts.len() < 3 {
                bail!("usage: create <name> <size> [priority] [critical]");
            }
            let size = parts[2].parse::<usize>().context("size must be a byte count")?;
            let priority = match parts.get(3) {
                Some(p) => p.parse::<i32>().context("priority must be an integer")?,
                None => DEFAULT_PRIORITY,
            };
            let critical = match parts.get(4) {
                Some(c) => c.parse::<u8>().context("critical must be 0 or 1")? != 0,
                None => false,
            };
            Command::Create {
                name: parts[1].to_string(),
                size,
                priority,
                critical,
            }
        }
        "kill" => Command::Kill(pid_arg(&parts, 1)?),
        "block" => Command::Block(pid_arg(&parts, 1)?),
        "unblock" => Command::Unblock(pid_arg(&parts, 1)?),
        "priority" => Command::Priority(
            pid_arg(&parts, 1)?,
            arg(&parts, 2, "<n>")?
                .parse::<i32>()
                .context("priority must be an integer")?,
        ),
        "step" => Command::Step,
        "run" => Command::Run,
        "stop" => Command::Stop,
        "inspect" | "view" => Command::Inspect,
        "exit" | "quit" => Command::Exit,
        other => bail!("unknown: {}", other),
    };

    Ok(Some(command))
}

fn print_step(report: Option<StepReport>) {
    let Some(report) = report else {
        println!("[Kernel] No process ready to run");
        return;
    };

    println!("[Kernel] Ran P{}", report.pid);
    for access in &report.accesses {
        let frame = access.outcome.frame();
        if access.outcome.is_hit() {
            println!("  [Memory] HIT P{} vpn={} -> frame={}", report.pid, access.vpn, frame);
        } else {
            let evicted = access
                .outcome
                .evicted()
                .map_or_else(|| "none".to_string(), |k| k.to_string());
            println!(
                "  [Memory] FAULT P{} vpn={} -> loaded frame={} evicted={}",
                report.pid, access.vpn, frame, evicted
            );
        }
    }
    if let Some(e) = &report.error {
        println!("  [Memory] {}", e);
    }
    println!("[Kernel] Time slice over for P{}", report.pid);
}

fn report_error(err: paging_kernel::KernelError) {
    eprintln!("{:?}", miette::Report::new(err));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = KernelConfig::from_env()?;
    let tick = config.tick_interval;
    let kernel = Kernel::new(config)?;
    let mut driver: Option<DriverHandle> = None;

    info!("Paging kernel console ready");
    println!("Rudimentary OS Kernel (type 'help')");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"kernel> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{:#}", e);
                continue;
            }
        };

        match command {
            Command::Help => println!("{}", HELP),
            Command::Create {
                name,
                size,
                priority,
                critical,
            } => match kernel.create_process(&name, size, priority, critical) {
                Ok(pid) => println!("[Kernel] Created P{}", pid),
                Err(e) => report_error(e),
            },
            Command::Kill(pid) => match kernel.kill_process(pid) {
                Ok(()) => println!("[Kernel] Killed PID {}", pid),
                Err(e) => report_error(e),
            },
            Command::Block(pid) => {
                if let Err(e) = kernel.block(pid) {
                    report_error(e);
                }
            }
            Command::Unblock(pid) => {
                if let Err(e) = kernel.unblock(pid) {
                    report_error(e);
                }
            }
            Command::Priority(pid, priority) => {
                if let Err(e) = kernel.set_priority(pid, priority) {
                    report_error(e);
                }
            }
            Command::Step => print_step(kernel.step()),
            Command::Run => {
                if driver.as_ref().is_some_and(DriverHandle::is_running) {
                    println!("[Kernel] Simulation already running");
                } else {
                    driver = Some(kernel.run(tick));
                    println!("[Kernel] Started simulation");
                }
            }
            Command::Stop => {
                if let Some(handle) = driver.take() {
                    let steps = handle.shutdown().await;
                    println!("[Kernel] Stopped simulation after {} steps", steps);
                }
            }
            Command::Inspect => {
                let snapshot = kernel.inspect();
                println!("=== KERNEL INSPECT ===");
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Command::Exit => break,
        }
    }

    if let Some(handle) = driver.take() {
        handle.shutdown().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_defaults() {
        assert_eq!(
            parse_command("create editor 100").unwrap(),
            Some(Command::Create {
                name: "editor".into(),
                size: 100,
                priority: DEFAULT_PRIORITY,
                critical: false,
            })
        );
    }

    #[test]
    fn test_parse_create_full() {
        assert_eq!(
            parse_command("CREATE db 300 4 1").unwrap(),
            Some(Command::Create {
                name: "db".into(),
                size: 300,
                priority: 4,
                critical: true,
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("create x").is_err());
        assert!(parse_command("kill").is_err());
        assert!(parse_command("kill abc").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_parse_aliases_and_blank() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("view").unwrap(), Some(Command::Inspect));
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Exit));
        assert_eq!(parse_command("priority 2 7").unwrap(), Some(Command::Priority(2, 7)));
    }
}
