use clap::{Arg, Command};
use std::io::{self, Write};

/// Emits a deterministic sample roster to stdout, handy for smoke-testing
/// an import against a sandbox database.
fn main() -> anyhow::Result<()> {
    let matches = Command::new("gen-roster")
        .arg(
            Arg::new("rows")
                .long("rows")
                .value_parser(clap::value_parser!(u64))
                .required(true),
        )
        .arg(
            Arg::new("org")
                .long("org")
                .help("Organization node assigned to every row")
                .default_value("Entire Organization"),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .help("Security role assigned to every row")
                .default_value("ViewOnly"),
        )
        .arg(Arg::new("domain").long("domain").default_value("example.com"))
        .get_matches();

    let rows: u64 = *matches.get_one("rows").unwrap();
    let org = matches.get_one::<String>("org").unwrap();
    let role = matches.get_one::<String>("role").unwrap();
    let domain = matches.get_one::<String>("domain").unwrap();

    let mut out = io::BufWriter::new(io::stdout().lock());

    writeln!(
        &mut out,
        "# username,password,organizationNodes,securityNode,firstName,lastName"
    )?;
    for i in 0..rows {
        writeln!(
            &mut out,
            "user{i:04}@{domain},Chang3Me!{i},{org},{role},Test,User{i:04}"
        )?;
        if i % 10_000 == 0 {
            out.flush()?;
        } // keep buffers moving on huge runs
    }

    out.flush()?;
    Ok(())
}
