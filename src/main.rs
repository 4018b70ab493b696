use anyhow::{Context, Result};
use dotenv::dotenv;
use gpig_graph::color::{lane_color, rgb};
use gpig_graph::config::Config;
use gpig_graph::{GraphLane, GraphLog, GraphNode, LogOptions, get_log, has_uncommitted_changes};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("failed to read configuration")?;
    let repo = git2::Repository::open(&config.repo_path)
        .with_context(|| format!("failed to open {}", config.repo_path.display()))?;

    let options = LogOptions {
        commits_limit: config.commits_limit,
        has_uncommitted_changes: config.show_uncommitted
            && has_uncommitted_changes(&repo).context("failed to read status")?,
    };

    match get_log(&repo, &options, None) {
        Ok(log) => print_log(&log),
        Err(error) => {
            print_log(&error.partial);
            return Err(error).context("graph is incomplete");
        }
    }
    Ok(())
}

fn print_log(log: &GraphLog) {
    for node in log.nodes() {
        println!("{}  {}", lanes(node, log.max_line()), describe(node));
    }
    println!(
        "Processed {} commits with {} lanes",
        log.len(),
        log.max_line()
    );
}

fn lanes(node: &GraphNode, width: usize) -> String {
    let mut cells: Vec<Option<(char, GraphLane)>> = vec![None; width];
    let mut put = |glyph: char, lane: &GraphLane| {
        if let Some(cell) = cells.get_mut(lane.position()) {
            *cell = Some((glyph, *lane));
        }
    };

    node.passing_lanes().iter().for_each(|lane| put('|', lane));
    node.forking_off_lanes().iter().for_each(|lane| put('/', lane));
    node.merging_lanes().iter().for_each(|lane| put('\\', lane));
    if let Some(lane) = node.lane() {
        put('*', &lane);
    }

    cells
        .into_iter()
        .map(|cell| match cell {
            Some((glyph, lane)) => {
                let (r, g, b) = rgb(lane_color(&lane));
                format!("\x1b[38;2;{r};{g};{b}m{glyph}\x1b[0m ")
            }
            None => "  ".to_string(),
        })
        .collect()
}

fn describe(node: &GraphNode) -> String {
    let commit = node.commit();
    if node.is_uncommitted() {
        return commit.summary().to_string();
    }

    let short: String = commit.oid.to_string().chars().take(7).collect();
    let date = commit
        .date_time()
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let refs = if node.ref_count() == 0 {
        String::new()
    } else {
        let names: Vec<&str> = node.refs().iter().map(|r| r.shorthand()).collect();
        format!("({}) ", names.join(", "))
    };

    format!("{short} {date} {refs}{}", commit.summary())
}
