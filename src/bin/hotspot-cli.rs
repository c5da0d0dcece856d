use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "hotspot-cli")]
#[command(about = "Management CLI for the hotspot admin service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    #[arg(short, long, env = "HOTSPOT_ADMIN_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// View session analytics
    Analytics,
    /// List active sessions
    Sessions {
        /// Evaluate at this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show the dashboard snapshot
    Dashboard,
    /// List the plan catalog
    Plans,
    /// Create or update a user
    AddUser {
        id: String,
        username: String,
        email: String,
    },
    /// Record a completed payment
    RecordPayment {
        user_id: String,
        amount: u32,
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = match cli.command {
        Commands::Status => {
            client.get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Analytics => {
            client.get(format!("{}/admin/analytics", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Sessions { at } => {
            let mut request = client.get(format!("{}/api/active-sessions", cli.url));
            if let Some(at) = at {
                request = request.query(&[("at", at)]);
            }
            request.send().await?
        }
        Commands::Dashboard => client.get(format!("{}/api/dashboard", cli.url)).send().await?,
        Commands::Plans => client.get(format!("{}/api/plans", cli.url)).send().await?,
        Commands::AddUser { id, username, email } => {
            client.post(format!("{}/admin/users", cli.url))
                .headers(headers)
                .json(&json!({ "id": id, "username": username, "email": email }))
                .send()
                .await?
        }
        Commands::RecordPayment { user_id, amount, id } => {
            client.post(format!("{}/admin/payments", cli.url))
                .headers(headers)
                .json(&json!({ "id": id, "userId": user_id, "amount": amount }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
