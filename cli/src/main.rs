mod render;

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use shopstream_admin::api::{ApiClient, ApiError};
use shopstream_admin::config::{Config, ConfigError};
use shopstream_admin::filter::{RoleFilter, ShopStatusFilter, StatusFilter, VerificationFilter};
use shopstream_admin::pages::dashboard::DashboardPage;
use shopstream_admin::pages::login::LoginForm;
use shopstream_admin::pages::shops::ShopsPage;
use shopstream_admin::pages::streamers::StreamersPage;
use shopstream_admin::pages::users::UsersPage;
use shopstream_admin::pages::{ActionError, ListPage, Record};
use shopstream_admin::routes::{self, Navigator, Route, RouteDecision};
use shopstream_admin::session::storage::FileStorage;
use shopstream_admin::session::{LoginError, SessionStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
    #[error("{}", .0.user_message())]
    Login(#[from] LoginError),
    #[error("{}", .0.user_message())]
    Action(#[from] ActionError),
    #[error("not signed in; run `shopstream login` first")]
    NotSignedIn,
    #[error("unknown page '{0}'")]
    UnknownRoute(String),
    #[error("no {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },
    #[error("refusing to delete without --yes")]
    ConfirmationRequired,
    #[error("failed to load {0}: {1}")]
    LoadFailed(&'static str, String),
    #[error("failed to read password: {0}")]
    Prompt(#[from] io::Error),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "shopstream", about = "Admin console for the ShopStream platform")]
struct Cli {
    #[arg(long, env = "SHOPSTREAM_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "SHOPSTREAM_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(LoginArgs),
    Logout,
    Whoami,
    /// Open a console page by path, e.g. `/users`.
    Open {
        path: String,
    },
    Dashboard,
    Users(UsersCommand),
    Streamers(StreamersCommand),
    Shops(ShopsCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long, env = "SHOPSTREAM_ADMIN_EMAIL")]
    email: String,

    #[arg(long, env = "SHOPSTREAM_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, default_value = "all")]
        role: RoleFilter,
    },
    Show {
        id: String,
    },
    Promote {
        id: String,
    },
    Demote {
        id: String,
    },
    Delete {
        id: String,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct StreamersCommand {
    #[command(subcommand)]
    command: StreamersSubcommand,
}

#[derive(Subcommand, Debug)]
enum StreamersSubcommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, default_value = "all")]
        status: VerificationFilter,
    },
    Show {
        id: String,
    },
    Verify {
        id: String,
    },
    Reject {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ShopsCommand {
    #[command(subcommand)]
    command: ShopsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ShopsSubcommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long, default_value = "all")]
        status: ShopStatusFilter,
    },
    Show {
        id: String,
    },
    Activate {
        id: String,
    },
    Deactivate {
        id: String,
    },
    Delete {
        id: String,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

/// Tells the operator when the backend ends the session mid-command.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        if route == Route::Login {
            eprintln!("session expired; run `shopstream login` to sign in again");
        }
    }
}

struct Console {
    client: ApiClient,
    session: Arc<SessionStore>,
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(dir) = cli.session_dir {
        config.session_dir = dir;
    }

    let session = Arc::new(SessionStore::restore(FileStorage::new(&config.session_dir)));
    let client = ApiClient::new(&config, Arc::clone(&session), Arc::new(TerminalNavigator))?;
    let console = Console { client, session, json: cli.json };

    match cli.command {
        Command::Login(args) => console.login(args).await,
        Command::Logout => {
            console.session.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => console.whoami(),
        Command::Open { path } => {
            let route = Route::parse(&path).ok_or(CliError::UnknownRoute(path))?;
            console.open(route).await
        }
        Command::Dashboard => console.open(Route::Dashboard).await,
        Command::Users(users) => console.users(users.command).await,
        Command::Streamers(streamers) => console.streamers(streamers.command).await,
        Command::Shops(shops) => console.shops(shops.command).await,
    }
}

impl Console {
    /// Run `route` through the guard. Returns the route to render.
    fn enter(&self, route: Route) -> Result<Route, CliError> {
        match routes::guard(route, &self.session) {
            RouteDecision::Render(route) => Ok(route),
            RouteDecision::Redirect(Route::Login) => Err(CliError::NotSignedIn),
            RouteDecision::Redirect(next) => {
                tracing::debug!(from = %route, to = %next, "redirected");
                Ok(next)
            }
        }
    }

    async fn open(&self, route: Route) -> Result<(), CliError> {
        match self.enter(route)? {
            Route::Dashboard => self.dashboard().await,
            Route::Users => self.users(UsersSubcommand::List { list: ListArgs::default(), role: RoleFilter::All }).await,
            Route::Streamers => {
                self.streamers(StreamersSubcommand::List { list: ListArgs::default(), status: VerificationFilter::All })
                    .await
            }
            Route::Shops => {
                self.shops(ShopsSubcommand::List { list: ListArgs::default(), status: ShopStatusFilter::All })
                    .await
            }
            Route::Login => {
                println!("{}", login_page_notice(self.session.is_authenticated())?);
                Ok(())
            }
            Route::Root => Ok(()),
        }
    }

    async fn login(&self, args: LoginArgs) -> Result<(), CliError> {
        let password = match args.password {
            Some(password) => password,
            None => prompt_password()?,
        };
        let mut form = LoginForm::new();
        form.email = args.email;
        form.password = password;
        let next = form.submit(&self.session, &self.client).await?;
        if let Some(user) = self.session.user() {
            println!("signed in as {}", user.email);
        }
        self.open(next).await
    }

    fn whoami(&self) -> Result<(), CliError> {
        let user = self.session.user().ok_or(CliError::NotSignedIn)?;
        if self.json {
            return print_json(&serde_json::to_value(&user)?);
        }
        println!("{}", render::profile(&user));
        Ok(())
    }

    async fn dashboard(&self) -> Result<(), CliError> {
        self.enter(Route::Dashboard)?;
        let mut page = DashboardPage::new();
        let stats = page.load(&self.client).await?;
        if self.json {
            return print_json(&serde_json::json!({
                "totalUsers": stats.total_users,
                "totalStreamers": stats.total_streamers,
                "verifiedStreamers": stats.verified_streamers,
                "pendingStreamers": stats.pending_streamers,
                "totalShops": stats.total_shops,
                "activeShops": stats.active_shops,
            }));
        }
        print!("{}", render::dashboard(&stats));
        Ok(())
    }

    async fn users(&self, command: UsersSubcommand) -> Result<(), CliError> {
        self.enter(Route::Users)?;
        let mut page = UsersPage::new();
        page.load(&self.client).await;
        loaded(&page.list, "users")?;

        match command {
            UsersSubcommand::List { list, role } => {
                page.list.set_search(list.search);
                page.list.set_status(role);
                if self.json {
                    return print_json(&serde_json::to_value(page.list.visible())?);
                }
                print!("{}", render::users(&page.list.visible(), &page.stats()));
            }
            UsersSubcommand::Show { id } => {
                let user = detail(&mut page.list, "user", &id)?;
                if self.json {
                    return print_json(&serde_json::to_value(&user)?);
                }
                print!("{}", render::user_detail(&user, page.promotion_control(&user)));
            }
            UsersSubcommand::Promote { id } => {
                page.make_streamer(&self.client, &id).await?;
                println!("{id} is now a streamer");
            }
            UsersSubcommand::Demote { id } => {
                page.make_regular(&self.client, &id).await?;
                println!("{id} is now a regular user");
            }
            UsersSubcommand::Delete { id, yes } => {
                if !yes {
                    return Err(CliError::ConfirmationRequired);
                }
                page.delete(&self.client, &id).await?;
                println!("deleted user {id}");
            }
        }
        Ok(())
    }

    async fn streamers(&self, command: StreamersSubcommand) -> Result<(), CliError> {
        self.enter(Route::Streamers)?;
        let mut page = StreamersPage::new();
        page.load(&self.client).await;
        loaded(&page.list, "streamers")?;

        match command {
            StreamersSubcommand::List { list, status } => {
                page.list.set_search(list.search);
                page.list.set_status(status);
                if self.json {
                    return print_json(&serde_json::to_value(page.list.visible())?);
                }
                print!("{}", render::streamers(&page.list.visible(), &page.stats()));
            }
            StreamersSubcommand::Show { id } => {
                let streamer = detail(&mut page.list, "streamer", &id)?;
                if self.json {
                    return print_json(&serde_json::to_value(&streamer)?);
                }
                print!("{}", render::streamer_detail(&streamer));
            }
            StreamersSubcommand::Verify { id } => {
                page.verify(&self.client, &id).await?;
                println!("verified streamer {id}");
            }
            StreamersSubcommand::Reject { id } => {
                page.reject(&self.client, &id).await?;
                println!("rejected streamer {id}");
            }
        }
        Ok(())
    }

    async fn shops(&self, command: ShopsSubcommand) -> Result<(), CliError> {
        self.enter(Route::Shops)?;
        let mut page = ShopsPage::new();
        page.load(&self.client).await;
        loaded(&page.list, "shops")?;

        match command {
            ShopsSubcommand::List { list, status } => {
                page.list.set_search(list.search);
                page.list.set_status(status);
                if self.json {
                    return print_json(&serde_json::to_value(page.list.visible())?);
                }
                print!("{}", render::shops(&page.list.visible(), &page.stats()));
            }
            ShopsSubcommand::Show { id } => {
                let shop = detail(&mut page.list, "shop", &id)?;
                if self.json {
                    return print_json(&serde_json::to_value(&shop)?);
                }
                print!("{}", render::shop_detail(&shop));
            }
            ShopsSubcommand::Activate { id } => {
                page.activate(&self.client, &id).await?;
                println!("activated shop {id}; owner is now a streamer");
            }
            ShopsSubcommand::Deactivate { id } => {
                page.deactivate(&self.client, &id).await?;
                println!("deactivated shop {id}; owner is now a regular user");
            }
            ShopsSubcommand::Delete { id, yes } => {
                if !yes {
                    return Err(CliError::ConfirmationRequired);
                }
                page.delete(&self.client, &id).await?;
                println!("deleted shop {id}");
            }
        }
        Ok(())
    }
}

/// Fail when the page's first load did not succeed.
fn loaded<T: Record, F: StatusFilter<T>>(
    list: &ListPage<T, F>,
    what: &'static str,
) -> Result<(), CliError> {
    match list.error() {
        Some(message) => Err(CliError::LoadFailed(what, message.to_string())),
        None => Ok(()),
    }
}

fn detail<T: Record, F: StatusFilter<T>>(
    list: &mut ListPage<T, F>,
    kind: &'static str,
    id: &str,
) -> Result<T, CliError> {
    if !list.open(id) {
        return Err(CliError::NotFound { kind, id: id.to_string() });
    }
    list.selected().cloned().ok_or_else(|| CliError::NotFound { kind, id: id.to_string() })
}

/// `/login` is public, so the guard renders it either way.
fn login_page_notice(authenticated: bool) -> Result<&'static str, CliError> {
    if authenticated {
        Ok("already signed in; run `shopstream logout` to switch accounts")
    } else {
        Err(CliError::NotSignedIn)
    }
}

const PASSWORD_PROMPT: &str =
    "password (input is visible; use --password or SHOPSTREAM_ADMIN_PASSWORD to avoid typing it): ";

fn prompt_password() -> Result<String, CliError> {
    read_password(&mut io::stdin().lock(), &mut io::stderr())
}

fn read_password(input: &mut impl BufRead, prompt: &mut impl Write) -> Result<String, CliError> {
    prompt.write_all(PASSWORD_PROMPT.as_bytes())?;
    prompt.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
