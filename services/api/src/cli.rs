use clap::{Args, Parser, Subcommand};
use realty_site::auth::TokenAuthority;
use realty_site::config::AppConfig;
use realty_site::content::Locale;
use realty_site::error::AppError;
use realty_site::seo::{HeadDocument, SeoContext, SeoResolver, SeoSubject};

use crate::infra::Stores;
use crate::seed;

#[derive(Parser, Debug)]
#[command(
    name = "realty-site",
    version,
    about = "Multilingual real-estate site backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Print an admin bearer token signed with the configured secret
    Token(TokenArgs),
    /// Resolve SEO metadata for a path against demo content and print the head
    Seo(SeoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host (defaults to APP_HOST or 127.0.0.1)
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port (defaults to APP_PORT or 3000)
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load demo properties, posts, services and FAQ entries before serving
    #[arg(long)]
    pub(crate) seed: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TokenArgs {
    /// Subject recorded in the token claims
    #[arg(long, default_value = "admin")]
    pub(crate) subject: String,
}

#[derive(Args, Debug)]
pub(crate) struct SeoArgs {
    /// Page path, with or without a locale prefix
    #[arg(long)]
    pub(crate) path: String,
    /// Blog slug whose payload should feed the page
    #[arg(long, conflicts_with = "property")]
    pub(crate) blog: Option<String>,
    /// Property id whose payload should feed the page
    #[arg(long)]
    pub(crate) property: Option<String>,
    /// en, ar or fr
    #[arg(long, default_value = "en", value_parser = parse_locale)]
    pub(crate) lang: Locale,
}

fn parse_locale(raw: &str) -> Result<Locale, String> {
    raw.parse::<Locale>().map_err(|err| err.to_string())
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => crate::server::run(args).await,
        Command::Token(args) => run_token(args),
        Command::Seo(args) => run_seo(args).await,
    }
}

fn run_token(args: TokenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let authority = TokenAuthority::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
    let issued = authority.issue(&args.subject)?;
    println!("{}", issued.token);
    eprintln!("expires in {}s", issued.expires_in);
    Ok(())
}

async fn run_seo(args: SeoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let stores = Stores::default();
    let summary = seed::load(&stores)?;

    let subject = match (args.property, args.blog) {
        (Some(id), _) => Some(SeoSubject::Property(id)),
        (None, Some(slug)) => Some(SeoSubject::Blog(slug)),
        (None, None) => None,
    };
    let mut context = SeoContext::new(args.path).with_locale(args.lang);
    context.subject = subject;

    let resolver = SeoResolver::new(config.site.clone(), stores.seo_source(&config.site));
    let metadata = resolver.resolve(&context).await;

    let mut head = HeadDocument::new();
    head.apply(&metadata);
    println!("{}", head.render());

    eprintln!(
        "demo properties: {}; demo blog slugs: {}",
        summary.property_ids.join(", "),
        summary.blog_slugs.join(", ")
    );
    Ok(())
}
