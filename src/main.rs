//! BoltLink CLI
//!
//! A small command-line front end for the client library: connect to a
//! server, run one command, print the result. Handy for poking at a server
//! without pulling in redis-cli.

use anyhow::{bail, Context};
use boltlink::{Client, ConnectionConfig};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// CLI configuration
struct Config {
    /// Server host
    host: String,
    /// Server port
    port: u16,
    /// Connect and I/O timeout in milliseconds
    timeout_ms: u64,
    /// The command and its arguments
    command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: boltlink::DEFAULT_HOST.to_string(),
            port: boltlink::DEFAULT_PORT,
            timeout_ms: 10_000,
            command: Vec::new(),
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    if i + 1 < args.len() {
                        config.host = args[i + 1].clone();
                        i += 2;
                    } else {
                        eprintln!("Error: --host requires a value");
                        std::process::exit(1);
                    }
                }
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        config.port = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid port number");
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --port requires a value");
                        std::process::exit(1);
                    }
                }
                "--timeout" | "-t" => {
                    if i + 1 < args.len() {
                        config.timeout_ms = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid timeout");
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --timeout requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("BoltLink version {}", boltlink::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    // Everything from the first non-flag argument on is the command
                    config.command = args[i..].to_vec();
                    break;
                }
            }
        }

        config
    }

    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn print_help() {
    println!(
        r#"
BoltLink - A Binary-Safe Redis Client

USAGE:
    boltlink [OPTIONS] COMMAND [ARGS...]

OPTIONS:
    -h, --host <HOST>       Server host (default: 127.0.0.1)
    -p, --port <PORT>       Server port (default: 6379)
    -t, --timeout <MS>      Connect/I-O timeout in milliseconds (default: 10000)
    -v, --version           Print version information
        --help              Print this help message

EXAMPLES:
    boltlink ping
    boltlink set name Ariz
    boltlink get name
    boltlink mget key1 key2 key3
    boltlink lrange mylist 0 -1
    boltlink info
"#
    );
}

fn print_value(value: Option<bytes::Bytes>) {
    match value {
        Some(v) => println!("\"{}\"", String::from_utf8_lossy(&v)),
        None => println!("(nil)"),
    }
}

async fn run(client: &mut Client, command: &[String]) -> anyhow::Result<()> {
    let name = command[0].to_uppercase();
    let args = &command[1..];

    let need = |n: usize| -> anyhow::Result<()> {
        if args.len() != n {
            bail!("wrong number of arguments for '{}'", name);
        }
        Ok(())
    };
    let int_arg = |i: usize| -> anyhow::Result<i64> {
        args[i]
            .parse()
            .with_context(|| format!("argument {} must be an integer", i + 1))
    };

    match name.as_str() {
        "PING" => {
            need(0)?;
            println!("{}", client.ping().await?);
        }
        "AUTH" => {
            need(1)?;
            client.auth(args[0].clone()).await?;
            println!("OK");
        }
        "ECHO" => {
            need(1)?;
            print_value(Some(client.echo(args[0].clone()).await?));
        }
        "SELECT" => {
            need(1)?;
            client.select(int_arg(0)?).await?;
            println!("OK");
        }
        "SET" => {
            need(2)?;
            client.set(args[0].clone(), args[1].clone()).await?;
            println!("OK");
        }
        "GET" => {
            need(1)?;
            print_value(client.get(args[0].clone()).await?);
        }
        "GETSET" => {
            need(2)?;
            print_value(client.getset(args[0].clone(), args[1].clone()).await?);
        }
        "SETNX" => {
            need(2)?;
            let set = client.setnx(args[0].clone(), args[1].clone()).await?;
            println!("(integer) {}", set as i64);
        }
        "SETEX" => {
            need(3)?;
            let ttl = int_arg(1)?;
            if ttl <= 0 {
                bail!("ttl must be positive");
            }
            client
                .setex(args[0].clone(), args[2].clone(), ttl as u64)
                .await?;
            println!("OK");
        }
        "DEL" => {
            need(1)?;
            let deleted = client.del(args[0].clone()).await?;
            println!("(integer) {}", deleted as i64);
        }
        "EXISTS" => {
            need(1)?;
            println!("(integer) {}", client.exists(args[0].clone()).await? as i64);
        }
        "TYPE" => {
            need(1)?;
            println!("{}", client.key_type(args[0].clone()).await?);
        }
        "KEYS" => {
            need(1)?;
            let names = client.keys(args[0].clone()).await?;
            if names.is_empty() {
                println!("(empty list)");
            }
            for (i, key) in names.into_iter().enumerate() {
                println!("{}) \"{}\"", i + 1, String::from_utf8_lossy(&key));
            }
        }
        "MGET" => {
            if args.is_empty() {
                bail!("wrong number of arguments for 'MGET'");
            }
            let values = client.mget(args.iter().cloned()).await?;
            for (i, value) in values.into_iter().enumerate() {
                print!("{}) ", i + 1);
                print_value(value);
            }
        }
        "INCR" => {
            need(1)?;
            println!("(integer) {}", client.incr(args[0].clone()).await?);
        }
        "INCRBY" => {
            need(2)?;
            let n = client.incr_by(args[0].clone(), int_arg(1)?).await?;
            println!("(integer) {}", n);
        }
        "DECR" => {
            need(1)?;
            println!("(integer) {}", client.decr(args[0].clone()).await?);
        }
        "DECRBY" => {
            need(2)?;
            let n = client.decr_by(args[0].clone(), int_arg(1)?).await?;
            println!("(integer) {}", n);
        }
        "RPUSH" => {
            need(2)?;
            let len = client.rpush(args[0].clone(), args[1].clone()).await?;
            println!("(integer) {}", len);
        }
        "LPUSH" => {
            need(2)?;
            let len = client.lpush(args[0].clone(), args[1].clone()).await?;
            println!("(integer) {}", len);
        }
        "LPOP" => {
            need(1)?;
            print_value(client.lpop(args[0].clone()).await?);
        }
        "RPOP" => {
            need(1)?;
            print_value(client.rpop(args[0].clone()).await?);
        }
        "LLEN" => {
            need(1)?;
            println!("(integer) {}", client.llen(args[0].clone()).await?);
        }
        "LRANGE" => {
            need(3)?;
            let items = client
                .lrange(args[0].clone(), int_arg(1)?, int_arg(2)?)
                .await?;
            if items.is_empty() {
                println!("(empty list)");
            }
            for (i, item) in items.into_iter().enumerate() {
                println!("{}) \"{}\"", i + 1, String::from_utf8_lossy(&item));
            }
        }
        "LREM" => {
            need(3)?;
            let removed = client
                .lrem(args[0].clone(), int_arg(1)?, args[2].clone())
                .await?;
            println!("(integer) {}", removed);
        }
        "LSET" => {
            need(3)?;
            client
                .lset(args[0].clone(), int_arg(1)?, args[2].clone())
                .await?;
            println!("OK");
        }
        "SADD" => {
            need(2)?;
            let added = client.sadd(args[0].clone(), args[1].clone()).await?;
            println!("(integer) {}", added as i64);
        }
        "SREM" => {
            need(2)?;
            let removed = client.srem(args[0].clone(), args[1].clone()).await?;
            println!("(integer) {}", removed as i64);
        }
        "SISMEMBER" => {
            need(2)?;
            let member = client.sismember(args[0].clone(), args[1].clone()).await?;
            println!("(integer) {}", member as i64);
        }
        "ZADD" => {
            need(3)?;
            let score: f64 = args[1].parse().context("score must be a number")?;
            let added = client.zadd(args[0].clone(), score, args[2].clone()).await?;
            println!("(integer) {}", added as i64);
        }
        "ZREM" => {
            need(2)?;
            let removed = client.zrem(args[0].clone(), args[1].clone()).await?;
            println!("(integer) {}", removed as i64);
        }
        "ZINCRBY" => {
            need(3)?;
            let increment: f64 = args[1].parse().context("increment must be a number")?;
            let score = client
                .zincrby(args[0].clone(), increment, args[2].clone())
                .await?;
            println!("{}", score);
        }
        "ZSCORE" => {
            need(2)?;
            match client.zscore(args[0].clone(), args[1].clone()).await? {
                Some(score) => println!("{}", score),
                None => println!("(nil)"),
            }
        }
        "ZRANK" => {
            need(2)?;
            match client.zrank(args[0].clone(), args[1].clone()).await? {
                Some(rank) => println!("(integer) {}", rank),
                None => println!("(nil)"),
            }
        }
        "ZREVRANK" => {
            need(2)?;
            match client.zrevrank(args[0].clone(), args[1].clone()).await? {
                Some(rank) => println!("(integer) {}", rank),
                None => println!("(nil)"),
            }
        }
        "LASTSAVE" => {
            need(0)?;
            println!("(integer) {}", client.lastsave().await?);
        }
        "INFO" => {
            need(0)?;
            let info = client.info().await?;
            let mut fields: Vec<_> = info.iter().collect();
            fields.sort();
            for (field, value) in fields {
                println!("{}: {}", field, value);
            }
        }
        _ => bail!("unknown command '{}'", name),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args();

    // Set up logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .init();

    if config.command.is_empty() {
        print_help();
        std::process::exit(1);
    }

    let conn_config = ConnectionConfig {
        connect_timeout: Duration::from_millis(config.timeout_ms),
        io_timeout: Duration::from_millis(config.timeout_ms),
        ..ConnectionConfig::default()
    };

    let mut client = Client::connect_with(config.address(), conn_config)
        .await
        .with_context(|| format!("cannot connect to {}", config.address()))?;

    let result = run(&mut client, &config.command).await;
    client.close().await;

    if let Err(e) = result {
        eprintln!("(error) {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
