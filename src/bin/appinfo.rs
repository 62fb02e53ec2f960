use appvdf::appinfo::AppInfoReader;
use appvdf::json::JsonOptions;
use std::env;
use std::error;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: appinfo <appinfo.vdf> [appid]");
        std::process::exit(2);
    };

    let mut reader = AppInfoReader::open(path)?;
    let stdout = io::stdout();
    let mut lock = stdout.lock();

    match args.get(2) {
        Some(appid) => {
            let appid: u32 = appid.parse()?;
            match reader.find(appid)? {
                Some(record) => {
                    let options = JsonOptions::new().with_prettyprint(true);
                    record.json().with_options(options).to_writer(&mut lock)?;
                    writeln!(lock)?;
                }
                None => {
                    eprintln!("no record for application {}", appid);
                    std::process::exit(1);
                }
            }
        }
        None => {
            // One record per line
            for record in reader.records() {
                record?.json().to_writer(&mut lock)?;
                writeln!(lock)?;
            }
        }
    }

    Ok(())
}
