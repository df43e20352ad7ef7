use std::env;
use std::process;

use domain::adapters::memory_repo::InMemoryRepo;
use domain::service::EmployeeService;
use domain::CoreError;

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  domain create <json> [<json>...]\n  domain list\n\nNotes:\n  - This demo CLI uses an in-memory repository; data is not persisted across runs.",
        domain::about()
    );
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("encode failed: {}", e))
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1); // skip program name

    let Some(cmd) = args.next() else {
        print_usage();
        return Ok(());
    };

    let svc = EmployeeService::new(InMemoryRepo::new());

    match cmd.as_str() {
        "create" => {
            let payloads: Vec<String> = args.collect();
            if payloads.is_empty() {
                return Err("missing <json> for create".into());
            }
            for raw in payloads {
                let value: serde_json::Value = serde_json::from_str(&raw)
                    .map_err(|e| format!("invalid json {:?}: {}", raw, e))?;
                match svc.create(value) {
                    Ok(employee) => println!("{}", to_json(&employee)?),
                    Err(CoreError::MalformedRequest(msg)) => {
                        return Err(format!("rejected {:?}: {}", raw, msg))
                    }
                    Err(e) => return Err(format!("create failed: {}", e)),
                }
            }
            Ok(())
        }
        "list" => {
            let all = svc.list_all().map_err(|e| format!("list failed: {}", e))?;
            println!("{}", to_json(&all)?);
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}
