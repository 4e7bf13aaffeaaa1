mod bounded_queue;
mod logging;
mod pipeline;
mod sequence;
mod sim;
mod types;

fn parse_usize_list(arg: &str) -> Option<Vec<usize>> {
    if arg == "-" {
        return None;
    }
    let mut values = Vec::new();
    for part in arg.split(',') {
        if part.trim().is_empty() {
            return None;
        }
        let value = part.trim().parse::<usize>().ok()?;
        values.push(value);
    }
    Some(values)
}

fn print_usage(program: &str) {
    println!("Assembly Line CLI");
    println!("Usage:");
    println!("  {program} (run demo)");
    println!("  {program} bench [producers] [consumers] [quota] [capacity] [validate]");
    println!("  {program} stress [producer_sets] [consumer_sets] [quota_sets] [capacity] [validate]");
    println!("  {program} --help");
    println!();
    println!(
        "Sets are comma-separated lists (e.g., 1,2,4). Use \"-\" to keep defaults for producer/consumer/quota sets."
    );
    println!("Omit capacity to keep its default.");
    println!("Defaults:");
    println!("  bench  producers=5 consumers=3 quota=10000 capacity=2");
    println!("  stress producers=1,2,4,8 consumers=1,2,4 quota=100,1000 capacity=2");
    println!("Flags:");
    println!("  validate  print violation lines for conservation/duplicate/capacity checks");
}

fn exit_with_usage(program: &str, message: &str) -> ! {
    eprintln!("{message}");
    print_usage(program);
    std::process::exit(2);
}

fn main() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "assembly_line".to_string());
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("bench") => {
            let producers = args.next().and_then(|v| v.parse::<usize>().ok());
            let consumers = args.next().and_then(|v| v.parse::<usize>().ok());
            let quota = args.next().and_then(|v| v.parse::<usize>().ok());
            let capacity = args.next().and_then(|v| v.parse::<usize>().ok());
            let mut validate = false;
            for arg in args {
                if arg.as_str() == "validate" {
                    validate = true;
                }
            }
            sim::run_benchmark(producers, consumers, quota, capacity, validate);
        }
        Some("stress") => {
            let mut producer_sets: Option<Vec<usize>> = None;
            let mut consumer_sets: Option<Vec<usize>> = None;
            let mut quota_sets: Option<Vec<usize>> = None;
            let mut capacity: Option<usize> = None;
            let mut producer_sets_skipped = false;
            let mut consumer_sets_skipped = false;
            let mut quota_sets_skipped = false;
            let mut validate = false;

            for arg in args {
                if arg.as_str() == "validate" {
                    validate = true;
                    continue;
                }

                let mut consumed = false;
                if producer_sets.is_none() && !producer_sets_skipped {
                    if arg == "-" {
                        producer_sets_skipped = true;
                        consumed = true;
                    } else if let Some(values) = parse_usize_list(&arg) {
                        producer_sets = Some(values);
                        consumed = true;
                    }
                    if !consumed {
                        exit_with_usage(
                            &program,
                            &format!("stress: invalid producer_sets value: {arg}"),
                        );
                    }
                    continue;
                }
                if consumer_sets.is_none() && !consumer_sets_skipped {
                    if arg == "-" {
                        consumer_sets_skipped = true;
                        consumed = true;
                    } else if let Some(values) = parse_usize_list(&arg) {
                        consumer_sets = Some(values);
                        consumed = true;
                    }
                    if !consumed {
                        exit_with_usage(
                            &program,
                            &format!("stress: invalid consumer_sets value: {arg}"),
                        );
                    }
                    continue;
                }
                if quota_sets.is_none() && !quota_sets_skipped {
                    if arg == "-" {
                        quota_sets_skipped = true;
                        consumed = true;
                    } else if let Some(values) = parse_usize_list(&arg) {
                        quota_sets = Some(values);
                        consumed = true;
                    }
                    if !consumed {
                        exit_with_usage(
                            &program,
                            &format!("stress: invalid quota_sets value: {arg}"),
                        );
                    }
                    continue;
                }
                if capacity.is_none() {
                    if let Ok(value) = arg.parse::<usize>() {
                        capacity = Some(value);
                    } else {
                        exit_with_usage(&program, &format!("stress: invalid capacity value: {arg}"));
                    }
                    continue;
                }

                exit_with_usage(&program, &format!("stress: unexpected argument: {arg}"));
            }

            sim::run_stress(producer_sets, consumer_sets, quota_sets, capacity, validate);
        }
        Some("--help") | Some("-h") | Some("help") => print_usage(&program),
        Some(other) => {
            exit_with_usage(&program, &format!("unknown command: {other}"));
        }
        None => sim::run_demo(),
    }
}
