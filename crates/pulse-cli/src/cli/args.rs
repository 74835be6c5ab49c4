use super::*;
#[derive(Parser)]
#[command(author, version, about = "Token health and campaign dashboard for the marketing backend")]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Config file (defaults to the user config dir)")]
    pub(super) config: Option<PathBuf>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Show token health, scheduler state and stats")]
    Dashboard(DashboardArgs),
    #[command(about = "Classify or refresh platform tokens")]
    Tokens(TokensArgs),
    #[command(about = "Inspect or toggle the post scheduler")]
    Scheduler(SchedulerArgs),
    #[command(about = "Manage connected social accounts")]
    Accounts(AccountsArgs),
    #[command(about = "Publish or schedule a social post")]
    Post(PostArgs),
    #[command(about = "List or cancel backend jobs")]
    Jobs(JobsArgs),
    #[command(about = "Manage config")]
    Config(ConfigArgs),
}

#[derive(Parser)]
pub(super) struct DashboardArgs {
    #[arg(long, help = "Print JSON instead of text")]
    pub(super) json: bool,
}

#[derive(Parser)]
pub(super) struct TokensArgs {
    #[command(subcommand)]
    pub(super) command: TokensCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum TokensCommands {
    #[command(about = "Classify token records from a JSON file without calling the backend")]
    Classify(ClassifyArgs),
    #[command(about = "Ask the backend to refresh tokens")]
    Refresh(RefreshArgs),
}

#[derive(Parser)]
pub(super) struct ClassifyArgs {
    #[arg(long, help = "JSON array of token records, or an overview object with `tokens`")]
    pub(super) file: PathBuf,
    #[arg(long, help = "Evaluate at this RFC 3339 instant instead of the current time")]
    pub(super) now: Option<String>,
    #[arg(long)]
    pub(super) json: bool,
}

#[derive(Parser)]
pub(super) struct RefreshArgs {
    #[arg(long, help = "Only refresh tokens of this platform")]
    pub(super) platform: Option<String>,
}

#[derive(Parser)]
pub(super) struct SchedulerArgs {
    #[command(subcommand)]
    pub(super) command: SchedulerCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum SchedulerCommands {
    Status,
    Start,
    Stop,
}

#[derive(Parser)]
pub(super) struct AccountsArgs {
    #[command(subcommand)]
    pub(super) command: AccountsCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum AccountsCommands {
    #[command(about = "List connected accounts")]
    List,
    #[command(about = "Start the OAuth connect flow and print the URL to open")]
    Connect(ConnectArgs),
    #[command(about = "Disconnect an account")]
    Disconnect(DisconnectArgs),
}

#[derive(Parser)]
pub(super) struct ConnectArgs {
    #[arg(long)]
    pub(super) platform: String,
}

#[derive(Parser)]
pub(super) struct DisconnectArgs {
    #[arg(long)]
    pub(super) platform: String,
    #[arg(long)]
    pub(super) account_id: String,
}

#[derive(Parser)]
pub(super) struct PostArgs {
    #[command(subcommand)]
    pub(super) command: PostCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum PostCommands {
    #[command(about = "Publish now, or at --at")]
    Publish(PublishArgs),
}

#[derive(Parser)]
pub(super) struct PublishArgs {
    #[arg(long, required = true, value_delimiter = ',')]
    pub(super) platform: Vec<String>,
    #[arg(long)]
    pub(super) content: String,
    #[arg(long)]
    pub(super) media: Vec<String>,
    #[arg(long, help = "RFC 3339 publish time")]
    pub(super) at: Option<String>,
}

#[derive(Parser)]
pub(super) struct JobsArgs {
    #[command(subcommand)]
    pub(super) command: JobsCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum JobsCommands {
    List,
    Cancel(CancelJobArgs),
}

#[derive(Parser)]
pub(super) struct CancelJobArgs {
    #[arg(long)]
    pub(super) id: String,
}

#[derive(Parser)]
pub(super) struct ConfigArgs {
    #[command(subcommand)]
    pub(super) command: ConfigCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ConfigCommands {
    #[command(about = "Write a config pointing at the backend")]
    Init(InitArgs),
    #[command(about = "Print the effective config")]
    Show,
    #[command(about = "Update individual settings")]
    Set(SetArgs),
}

#[derive(Parser)]
pub(super) struct InitArgs {
    #[arg(long)]
    pub(super) api_url: String,
    #[arg(long)]
    pub(super) api_token: Option<String>,
}

#[derive(Parser)]
pub(super) struct SetArgs {
    #[arg(long)]
    pub(super) api_url: Option<String>,
    #[arg(long)]
    pub(super) expiring_soon_hours: Option<u32>,
    #[arg(long)]
    pub(super) trust_backend_flags: Option<bool>,
}
