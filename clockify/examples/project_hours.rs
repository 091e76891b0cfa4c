use clockify::{ClockifyClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use std::collections::HashMap;
use std::env;
use std::error::Error;
use time::{Duration, OffsetDateTime};

const DAYS_BACK: i64 = 30;

struct ProjectInfo {
    project_name: String,
    total: Duration,
    entries: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let client = get_client().await?;

    let projects = client.fetch_projects().await?;
    let names: HashMap<String, String> = projects
        .into_iter()
        .map(|project| (project.id, project.name))
        .collect();

    let now = OffsetDateTime::now_utc();
    let entries = client
        .fetch_entries(now - Duration::days(DAYS_BACK), now)
        .await?;

    let mut project_times: HashMap<String, ProjectInfo> = HashMap::new();
    for entry in entries {
        let project_id = entry.project_id.clone().unwrap_or_default();
        let duration = entry.time_interval.duration_at(now);
        project_times
            .entry(project_id.clone())
            .and_modify(|info| {
                info.total += duration;
                info.entries += 1;
            })
            .or_insert_with(|| ProjectInfo {
                project_name: names
                    .get(&project_id)
                    .cloned()
                    .unwrap_or_else(|| "No Project".to_string()),
                total: duration,
                entries: 1,
            });
    }

    let mut projects: Vec<_> = project_times.into_values().collect();
    projects.sort_by(|a, b| b.total.cmp(&a.total));

    println!("Hours per project over the last {DAYS_BACK} days:");
    for ProjectInfo {
        project_name,
        total,
        entries,
    } in projects
    {
        println!(
            "{} ({}) | {} entries",
            project_name,
            format_hours_minutes(total),
            entries
        );
    }

    Ok(())
}

async fn get_client() -> Result<ClockifyClient, Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let api_key = env::var("CLOCKIFY_API_KEY")?;
    let base_url = env::var("CLOCKIFY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let client = ClockifyClient::new(api_key, base_url, DEFAULT_TIMEOUT)?;
    let user = client.current_user().await?;
    let workspace_id = env::var("CLOCKIFY_WORKSPACE_ID").unwrap_or(user.active_workspace);

    Ok(client.with_workspace(workspace_id).with_user(user.id))
}

fn format_hours_minutes(duration: Duration) -> String {
    let total_minutes = duration.whole_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{hours:02}:{minutes:02}")
}
