//! govlens: terminal dashboard for network governance
//!
//! Browse and filter governance proposals, follow topics, manage the user
//! profile held by the preference service, and map source paths onto the
//! network's architecture layers.

mod config;
mod render;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use govlens_client::{
    GovernanceClient, HttpConfig, HttpGovernanceBackend, HttpUserConnector, Identity,
    ProfileForm, Session,
};
use govlens_core::{
    ending_soon, layer, search_topics, sorted, FileTree, FollowTracker, FollowingFilter,
    ProposalQuery, SortOrder, StatusFilter, TopicFilter, LAYERS,
};

use config::GovlensConfig;

#[derive(Parser)]
#[command(name = "govlens")]
#[command(about = "Explore network governance proposals and architecture")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "govlens.toml")]
    config: PathBuf,

    /// Governance interface URL (overrides config file)
    #[arg(long, env = "GOVLENS_GOVERNANCE_URL")]
    governance_url: Option<String>,

    /// User backend URL (overrides config file)
    #[arg(long, env = "GOVLENS_BACKEND_URL")]
    backend_url: Option<String>,

    /// Principal to act as (overrides config file)
    #[arg(long, env = "GOVLENS_PRINCIPAL")]
    principal: Option<String>,

    /// Bearer token for the user backend (overrides config file)
    #[arg(long, env = "GOVLENS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List topics with open-proposal counts
    Topics {
        /// Filter by name or description
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// List open proposals
    Proposals(ProposalArgs),

    /// Open proposals closing within 48 hours
    EndingSoon,

    /// Show one proposal
    Proposal {
        id: u64,
    },

    /// Proposals for followed topics
    Following {
        /// all, active, ending-soon or past
        #[arg(short, long, default_value = "active")]
        filter: FollowingFilter,
    },

    /// Manage the signed-in user's profile
    #[command(subcommand)]
    User(UserCommands),

    /// How to review proposals, or one topic's review guide
    Learn {
        topic: Option<String>,
    },

    /// Architecture layers, or the layers claiming a path
    Layers {
        path: Option<String>,
    },

    /// Render a source tree, highlighting one layer's paths
    Tree {
        /// File with one path per line; `-` reads stdin
        file: PathBuf,

        /// Layer id to highlight
        #[arg(short, long)]
        layer: Option<String>,

        /// Expand every directory instead of only those leading to matches
        #[arg(long)]
        expand_all: bool,
    },
}

#[derive(Debug, Args)]
struct ProposalArgs {
    /// all, open, rejected, adopted, executed or failed
    #[arg(long, default_value = "all")]
    status: StatusFilter,

    /// Topic id, or `all`
    #[arg(long, default_value = "all")]
    topic: TopicFilter,

    /// Case-insensitive text search over title and summary
    #[arg(short, long, default_value = "")]
    search: String,

    /// newest, ending-soon or most-voted
    #[arg(long, default_value = "newest")]
    sort: SortOrder,

    /// Pages to load (only for an unfiltered view)
    #[arg(long, default_value = "1")]
    pages: u32,
}

#[derive(Debug, Subcommand)]
enum UserCommands {
    /// Show the current profile
    Show,

    /// Look up another user's profile
    Lookup {
        principal: String,
    },

    /// Number of registered users
    Count,

    /// List registered users, one page at a time
    List {
        /// Page number, starting at 0
        #[arg(long, default_value = "0")]
        page: u32,

        /// Users per page
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Create a profile
    Create(ProfileFields),

    /// Replace the profile; omitted fields are cleared
    Update(ProfileFields),

    /// Delete the profile and sign out
    Delete,

    /// Link a neuron to the profile
    AddNeuron {
        neuron_id: String,
    },

    /// Follow a topic
    Follow {
        topic: String,
    },

    /// Unfollow a topic
    Unfollow {
        topic: String,
    },

    /// List followed topics
    Follows,
}

#[derive(Debug, Args)]
struct ProfileFields {
    #[arg(long, default_value = "")]
    username: String,

    #[arg(long, default_value = "")]
    logo_url: String,

    #[arg(long, default_value = "")]
    neuron_id: String,
}

impl From<ProfileFields> for ProfileForm {
    fn from(fields: ProfileFields) -> Self {
        ProfileForm {
            username: fields.username,
            logo_url: fields.logo_url,
            neuron_id: fields.neuron_id,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("govlens=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = GovlensConfig::load(&cli.config)?;

    // Apply CLI overrides
    if let Some(url) = cli.governance_url {
        config.governance.url = url;
    }
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }
    if let Some(principal) = cli.principal {
        config.identity.principal = Some(principal);
    }
    if let Some(token) = cli.token {
        config.identity.token = Some(token);
    }

    info!(governance = %config.governance.url, backend = %config.backend.url, "Starting govlens");

    let mut session = build_session(&config)?;
    run(&mut session, cli.command).await
}

fn build_session(config: &GovlensConfig) -> anyhow::Result<Session> {
    let governance = HttpGovernanceBackend::new(
        HttpConfig::new(&config.governance.url).with_timeout(config.governance.timeout_secs),
    )
    .context("building governance client")?;
    let governance = GovernanceClient::new(Arc::new(governance))
        .with_page_size(config.governance.page_size);

    let connector = HttpUserConnector::new(
        HttpConfig::new(&config.backend.url).with_timeout(config.backend.timeout_secs),
    );

    let mut session = Session::new(governance, Arc::new(connector));
    if let Some(principal) = &config.identity.principal {
        let mut identity = Identity::new(principal.clone());
        identity.token = config.identity.token.clone();
        session.sign_in(identity)?;
    }
    Ok(session)
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

async fn run(session: &mut Session, command: Commands) -> anyhow::Result<()> {
    let now = now_secs();

    match command {
        Commands::Topics { search } => {
            let topics = session.governance().open_topics().await;
            print!("{}", render::topics(&search_topics(&topics, &search)));
        }

        Commands::Proposals(args) => {
            let governance = session.governance();
            let query = ProposalQuery::new()
                .with_status(args.status)
                .with_topic(args.topic)
                .with_search(args.search)
                .with_sort(args.sort);

            let mut feed = governance.load_feed().await;
            for _ in 1..args.pages {
                if !feed.can_load_more(&query) {
                    break;
                }
                governance.load_more(&mut feed).await;
            }

            let view = feed.view(&query);
            print!("{}", render::proposals(&view, feed.registry(), now));
            if feed.can_load_more(&query) {
                println!("More proposals available (--pages {})", args.pages + 1);
            }
        }

        Commands::EndingSoon => {
            let governance = session.governance();
            let page = governance.list_open_proposals(None, None).await;
            let soon = sorted(ending_soon(&page.proposals, now), SortOrder::EndingSoon);
            print!("{}", render::proposals(&soon, governance.registry(), now));
        }

        Commands::Proposal { id } => {
            let governance = session.governance();
            match governance.get_proposal(id).await {
                Some(p) => print!("{}", render::proposal_detail(&p, governance.registry(), now)),
                None => bail!("Proposal {} not found", id),
            }
        }

        Commands::Following { filter } => {
            let followed = session.users()?.get_followed_topics().await?;
            if followed.is_empty() {
                println!("Not following any topics");
                return Ok(());
            }
            let topics: Vec<String> = followed.into_iter().collect();
            let governance = session.governance();
            let feed = governance.fetch_following(&topics).await;
            print!(
                "{}",
                render::following(&feed.filtered(filter, now), governance.registry(), now)
            );
        }

        Commands::User(cmd) => run_user(session, cmd).await?,

        Commands::Learn { topic } => {
            let registry = session.governance().registry();
            match topic {
                Some(id) => match registry.definition(&id) {
                    Some(definition) => {
                        print!("{}", render::topic_guide(definition, registry.guide(&id)))
                    }
                    None => bail!("Topic not found: {}", id),
                },
                None => print!("{}", render::learn_overview(registry)),
            }
        }

        Commands::Layers { path } => match path {
            Some(path) => print!("{}", render::path_layers(&path)),
            None => print!("{}", render::layers(LAYERS)),
        },

        Commands::Tree {
            file,
            layer: layer_id,
            expand_all,
        } => {
            let paths = read_paths(&file)?;
            let mut tree = FileTree::from_paths(paths.iter().map(String::as_str));

            let patterns = match layer_id {
                Some(id) => match layer(&id) {
                    Some(l) => l.patterns()?,
                    None => bail!("Unknown layer: {}", id),
                },
                None => Vec::new(),
            };

            if expand_all {
                tree.expand_all();
            } else {
                let matched = tree.reveal_matching(&patterns);
                info!(matched, "Revealed matching paths");
            }
            print!("{}", render::tree(&tree, &tree.visible_rows(), &patterns));
        }
    }

    Ok(())
}

async fn run_user(session: &mut Session, cmd: UserCommands) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Show => match session.refresh_account().await?.profile() {
            Some(profile) => print!("{}", render::profile(profile)),
            None => println!("No profile yet; create one with `govlens user create`"),
        },

        UserCommands::Lookup { principal } => match session.users()?.get_user(&principal).await? {
            Some(profile) => print!("{}", render::profile(&profile)),
            None => bail!("No profile for {}", principal),
        },

        UserCommands::Count => {
            println!("{}", session.users()?.user_count().await?);
        }

        UserCommands::List { page, limit } => {
            let profiles = session.users()?.list_users(page, limit).await?;
            print!("{}", render::users(&profiles, page));
        }

        UserCommands::Create(fields) => {
            let args = ProfileForm::from(fields).into_args()?;
            if let Some(profile) = session.create_account(args).await?.profile() {
                print!("{}", render::profile(profile));
            }
        }

        UserCommands::Update(fields) => {
            let args = ProfileForm::from(fields).into_args()?;
            if let Some(profile) = session.update_account(args).await?.profile() {
                print!("{}", render::profile(profile));
            }
        }

        UserCommands::Delete => {
            session.delete_account().await?;
            println!("Profile deleted");
        }

        UserCommands::AddNeuron { neuron_id } => {
            let neuron_id = govlens_client::parse_neuron_id(&neuron_id)?;
            session.add_neuron(neuron_id).await?;
            println!("Neuron {} linked", neuron_id);
        }

        UserCommands::Follow { topic } => set_following(session, &topic, true).await?,

        UserCommands::Unfollow { topic } => set_following(session, &topic, false).await?,

        UserCommands::Follows => {
            for topic in session.users()?.get_followed_topics().await? {
                println!("{}", topic);
            }
        }
    }

    Ok(())
}

async fn set_following(session: &Session, topic: &str, follow: bool) -> anyhow::Result<()> {
    let users = session.users()?;
    let mut tracker = FollowTracker::new();
    tracker.load(&users.get_followed_topics().await?);

    let following = users.set_following(&mut tracker, topic, follow).await?;
    if following {
        println!("Following {}", topic);
    } else {
        println!("Unfollowed {}", topic);
    }
    Ok(())
}

fn read_paths(file: &Path) -> anyhow::Result<Vec<String>> {
    let content = if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
