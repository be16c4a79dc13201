//! cinedeck - movie/TV catalogue CLI backed by TMDB.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_KEY_ENV, AppConfig, resolve_api_key, resolve_config_path};
use cinedeck_api::tmdb::{
    Credits, DEFAULT_BASE_PATH, EndpointKind, MediaClient, MediaDetail, MediaImages,
    MediaListResult, MediaType, RequestDescriptor, Reviews, UrlBuilder, redact_api_key,
};
use cinedeck_query::{
    Carousel, Catalog, FavoriteShowcase, FavoriteTable, GenreLists, HeroArt, HeroBanner,
};

/// Image size used for printed backdrop URLs.
const BACKDROP_SIZE: &str = "w780";

/// Image size used for printed logo URLs.
const LOGO_SIZE: &str = "w500";

/// Characters of review text shown per review.
const REVIEW_EXCERPT_CHARS: usize = 120;

/// Cast members shown by `credits`.
const CAST_LIMIT: usize = 10;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the request URL for a descriptor without sending it.
    Url(DescriptorArgs),
    /// Discover movies or TV by genre, language, country or people.
    Discover(DiscoverArgs),
    /// Fetch a listing endpoint (popular, top-rated, similar, ...).
    List(DescriptorArgs),
    /// Fetch details for every entry of a listing, or for one entity.
    Details(SecondaryArgs),
    /// Fetch images for every entry of a listing, or for one entity.
    Images(SecondaryArgs),
    /// Fetch cast and crew of one entity.
    Credits(EntityArgs),
    /// Fetch reviews of one entity.
    Reviews(EntityArgs),
    /// Search movies, TV and people.
    Search(SearchArgs),
    /// List movie and TV genres.
    Genres,
    /// Show the hero banner and a page of curated favorites.
    Favorites(FavoritesArgs),
    /// Write a starter config file with the built-in favorites.
    Init(InitArgs),
}

/// Endpoint family accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EndpointArg {
    Discover,
    Details,
    Images,
    Credits,
    Reviews,
    Search,
    GenreList,
    Season,
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    OnTheAir,
    AiringToday,
    Videos,
    Similar,
    Recommendations,
}

impl From<EndpointArg> for EndpointKind {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::Discover => Self::Discover,
            EndpointArg::Details => Self::Details,
            EndpointArg::Images => Self::Images,
            EndpointArg::Credits => Self::Credits,
            EndpointArg::Reviews => Self::Reviews,
            EndpointArg::Search => Self::Search,
            EndpointArg::GenreList => Self::GenreList,
            EndpointArg::Season => Self::Season,
            EndpointArg::Popular => Self::Popular,
            EndpointArg::TopRated => Self::TopRated,
            EndpointArg::NowPlaying => Self::NowPlaying,
            EndpointArg::Upcoming => Self::Upcoming,
            EndpointArg::OnTheAir => Self::OnTheAir,
            EndpointArg::AiringToday => Self::AiringToday,
            EndpointArg::Videos => Self::Videos,
            EndpointArg::Similar => Self::Similar,
            EndpointArg::Recommendations => Self::Recommendations,
        }
    }
}

/// Media type accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MediaTypeArg {
    Movie,
    Tv,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Movie => Self::Movie,
            MediaTypeArg::Tv => Self::Tv,
        }
    }
}

/// Request descriptor fields.
#[derive(clap::Args)]
struct DescriptorArgs {
    /// Endpoint family.
    #[arg(long, value_enum, default_value_t = EndpointArg::Popular)]
    endpoint: EndpointArg,

    /// Media type (default: movie).
    #[arg(long, value_enum)]
    media_type: Option<MediaTypeArg>,

    /// Entity id for per-entity endpoints.
    #[arg(long)]
    id: Option<u64>,

    /// Original language filter (ISO 639-1, e.g. "ja").
    #[arg(long)]
    language: Option<String>,

    /// Season number for the `season` endpoint (default: 1).
    #[arg(long)]
    season: Option<u32>,

    /// Comma-separated genre ids.
    #[arg(long)]
    genre: Option<String>,

    /// Origin country (ISO 3166-1).
    #[arg(long)]
    country: Option<String>,

    /// Comma-separated person ids.
    #[arg(long)]
    people: Option<String>,

    /// Search query for the `search` endpoint.
    #[arg(long)]
    query: Option<String>,
}

impl DescriptorArgs {
    /// Builds the request descriptor.
    fn to_descriptor(&self) -> RequestDescriptor {
        let mut descriptor = RequestDescriptor::new(self.endpoint.into());
        descriptor.media_type = self.media_type.map(MediaType::from);
        descriptor.id = self.id;
        descriptor.original_language.clone_from(&self.language);
        descriptor.season_number = self.season;
        descriptor.genre.clone_from(&self.genre);
        descriptor.original_country.clone_from(&self.country);
        descriptor.people.clone_from(&self.people);
        descriptor.query.clone_from(&self.query);
        descriptor
    }
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Media type.
    #[arg(long, value_enum, default_value_t = MediaTypeArg::Movie)]
    media_type: MediaTypeArg,

    /// Comma-separated genre ids.
    #[arg(long)]
    genre: Option<String>,

    /// Original language filter (ISO 639-1).
    #[arg(long)]
    language: Option<String>,

    /// Origin country (ISO 3166-1).
    #[arg(long)]
    country: Option<String>,

    /// Comma-separated person ids.
    #[arg(long)]
    people: Option<String>,
}

impl DiscoverArgs {
    /// Builds a `discover` descriptor.
    fn to_descriptor(&self) -> RequestDescriptor {
        let mut descriptor =
            RequestDescriptor::new(EndpointKind::Discover).media_type(self.media_type.into());
        descriptor.genre.clone_from(&self.genre);
        descriptor.original_language.clone_from(&self.language);
        descriptor.original_country.clone_from(&self.country);
        descriptor.people.clone_from(&self.people);
        descriptor
    }
}

/// Arguments for the `details` and `images` subcommands.
#[derive(clap::Args)]
struct SecondaryArgs {
    /// Fetch one entity by id instead of fanning out over a listing.
    #[arg(long, conflicts_with = "endpoint")]
    entity: Option<u64>,

    /// Listing to fan out over.
    #[command(flatten)]
    listing: DescriptorArgs,
}

/// Arguments for single-entity subcommands.
#[derive(clap::Args)]
struct EntityArgs {
    /// Media type.
    #[arg(long, value_enum, default_value_t = MediaTypeArg::Movie)]
    media_type: MediaTypeArg,

    /// TMDB id.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Free-text query.
    query: String,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesArgs {
    /// Carousel page to show (0-based).
    #[arg(long, default_value_t = 0)]
    page: usize,
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Loads the config for `dir`.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or parsed.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Builds a `MediaClient` from the config and `TMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if no API key is available or the client fails to build.
#[instrument(skip_all)]
fn build_media_client(config: &AppConfig) -> Result<MediaClient> {
    let api_key = resolve_api_key(std::env::var(API_KEY_ENV).ok(), &config.api)?;
    let user_agent = config.api.user_agent.clone().unwrap_or_else(|| {
        String::from(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
    });

    let mut builder = MediaClient::builder().api_key(api_key).user_agent(user_agent);
    if let Some(base_url) = &config.api.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(interval) = config.api.min_interval() {
        builder = builder.min_interval(interval);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the catalog and returns it with the loaded config.
///
/// # Errors
///
/// Returns an error if config loading or client construction fails.
fn build_catalog(dir: Option<&PathBuf>) -> Result<(Catalog<MediaClient>, AppConfig)> {
    let config = load_config(dir)?;
    let client = build_media_client(&config)?;
    Ok((Catalog::new(client), config))
}

/// Logs the request URL with the API key redacted.
fn log_url(url: &str) {
    tracing::info!("{}", redact_api_key(url));
}

/// Logs one line per listing entry.
fn log_summaries(list: &MediaListResult) {
    tracing::info!("Total results: {}", list.total_results);
    for summary in &list.results {
        let date = summary
            .release_date
            .as_deref()
            .or(summary.first_air_date.as_deref())
            .unwrap_or("-");
        tracing::info!("{}\t{}\t{}", summary.id, summary.display_title(), date);
    }
}

/// Logs one line per detail object.
fn log_details(details: &[MediaDetail]) {
    for detail in details {
        let genres = detail
            .genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let runtime = detail
            .runtime
            .map_or_else(|| String::from("-"), |minutes| format!("{minutes}m"));
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            detail.id,
            detail.display_title(),
            runtime,
            genres,
            detail.tagline.as_deref().unwrap_or("")
        );
    }
}

/// Logs image counts and key art URLs per image set.
fn log_images(images: &[MediaImages]) {
    for set in images {
        let art = HeroArt::from_images(set);
        tracing::info!(
            "{}\tbackdrops={}\tposters={}\tlogos={}\t{}",
            set.id,
            set.backdrops.len(),
            set.posters.len(),
            set.logos.len(),
            art.tile_url(Some(BACKDROP_SIZE))
                .unwrap_or_else(|| String::from("-"))
        );
    }
}

/// Logs the first cast members and the directing crew.
fn log_credits(credits: &Credits) {
    for member in credits.cast.iter().take(CAST_LIMIT) {
        tracing::info!(
            "cast\t{}\t{}",
            member.name,
            member.character.as_deref().unwrap_or("-")
        );
    }
    for member in credits
        .crew
        .iter()
        .filter(|member| member.job.as_deref() == Some("Director"))
    {
        tracing::info!("director\t{}", member.name);
    }
}

/// Logs author and an excerpt per review.
fn log_reviews(reviews: &Reviews) {
    tracing::info!("Total reviews: {}", reviews.total_results);
    for review in &reviews.results {
        let excerpt: String = review.content.chars().take(REVIEW_EXCERPT_CHARS).collect();
        tracing::info!("{}\t{}", review.author, excerpt.replace('\n', " "));
    }
}

/// Logs both genre lists.
fn log_genres(genres: &GenreLists) {
    for (label, list) in [("movie", &genres.movie), ("tv", &genres.tv)] {
        for genre in &list.genres {
            tracing::info!("{label}\t{}\t{}", genre.id, genre.name);
        }
    }
}

/// Logs the hero banner and one carousel page of favorites.
fn log_favorites(
    hero: &HeroBanner,
    table: &FavoriteTable,
    showcase: &FavoriteShowcase,
    page: usize,
) {
    tracing::info!(
        "Hero: {}\t{}",
        hero.detail.display_title(),
        hero.art
            .tile_url(Some(BACKDROP_SIZE))
            .unwrap_or_else(|| String::from("-"))
    );

    let carousel = Carousel::new(table.len());
    let page = page.min(carousel.max_index());
    tracing::info!(
        "Page {}/{} (next: {})",
        page,
        carousel.max_index(),
        carousel.next_index(page)
    );

    let range = carousel.page_range(page);
    let entries = carousel.page(table.entries(), page);
    let images = showcase.images.get(range).unwrap_or_default();
    for (entry, set) in entries.iter().zip(images) {
        let art = HeroArt::from_images(set);
        let tagline = showcase
            .details_by_id
            .get(&entry.id)
            .and_then(|detail| detail.tagline.as_deref())
            .unwrap_or("");
        tracing::info!(
            "{}\t{}\t{}\t{}",
            entry.id,
            entry.title,
            art.logo_url(Some(LOGO_SIZE))
                .unwrap_or_else(|| String::from("-")),
            tagline
        );
    }
}

/// Runs the `url` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
fn run_url(args: &DescriptorArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let api_key = resolve_api_key(std::env::var(API_KEY_ENV).ok(), &config.api)
        .unwrap_or_else(|_| String::from("-"));
    let base = config
        .api
        .base_url
        .unwrap_or_else(|| String::from(DEFAULT_BASE_PATH));
    let urls = UrlBuilder::new(base, api_key);
    log_url(&urls.build(&args.to_descriptor()));
    Ok(())
}

/// Runs the `discover` and `list` subcommands.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_list(descriptor: &RequestDescriptor, dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, _) = build_catalog(dir)?;
    let list = catalog
        .media_list(descriptor)
        .await
        .context("TMDB listing request failed")?;
    log_summaries(&list);
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or any request fails.
#[instrument(skip_all)]
async fn run_details(args: &SecondaryArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, _) = build_catalog(dir)?;
    let media_type = args.listing.media_type.map_or(MediaType::Movie, MediaType::from);
    let details = if let Some(id) = args.entity {
        vec![
            catalog
                .detail(media_type, id)
                .await
                .context("TMDB details request failed")?,
        ]
    } else {
        catalog
            .media_details(&args.listing.to_descriptor())
            .await
            .context("TMDB details aggregation failed")?
    };
    log_details(&details);
    Ok(())
}

/// Runs the `images` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or any request fails.
#[instrument(skip_all)]
async fn run_images(args: &SecondaryArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, _) = build_catalog(dir)?;
    let media_type = args.listing.media_type.map_or(MediaType::Movie, MediaType::from);
    let images = if let Some(id) = args.entity {
        vec![
            catalog
                .images(media_type, id)
                .await
                .context("TMDB images request failed")?,
        ]
    } else {
        catalog
            .media_images(&args.listing.to_descriptor())
            .await
            .context("TMDB images aggregation failed")?
    };
    log_images(&images);
    Ok(())
}

/// Runs the `credits` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_credits(args: &EntityArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, _) = build_catalog(dir)?;
    let credits = catalog
        .credits(args.media_type.into(), args.id)
        .await
        .context("TMDB credits request failed")?;
    log_credits(&credits);
    Ok(())
}

/// Runs the `reviews` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_reviews(args: &EntityArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, _) = build_catalog(dir)?;
    let reviews = catalog
        .reviews(args.media_type.into(), args.id)
        .await
        .context("TMDB reviews request failed")?;
    log_reviews(&reviews);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, _) = build_catalog(dir)?;
    let results = catalog
        .search(&args.query)
        .await
        .context("TMDB search request failed")?;
    log_summaries(&results);
    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or either request fails.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, _) = build_catalog(dir)?;
    let genres = catalog
        .genre_lists()
        .await
        .context("TMDB genre list request failed")?;
    log_genres(&genres);
    Ok(())
}

/// Runs the `favorites` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or any request fails.
#[instrument(skip_all)]
async fn run_favorites(args: &FavoritesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (catalog, config) = build_catalog(dir)?;
    let table = config.favorite_table();
    let (hero, showcase) = tokio::join!(catalog.hero(&table), catalog.favorite_showcase(&table));
    let hero = hero.context("TMDB hero request failed")?;
    let showcase = showcase.context("TMDB favorites aggregation failed")?;
    log_favorites(&hero, &table, &showcase, args.page);
    Ok(())
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the config exists and `--force` is not set, or
/// the file cannot be written.
fn run_init(args: &InitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let config = AppConfig {
        favorites: FavoriteTable::builtin().entries().to_vec(),
        ..AppConfig::default()
    };
    config.save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Url(args) => run_url(&args, dir),
        Commands::Discover(args) => run_list(&args.to_descriptor(), dir).await,
        Commands::List(args) => run_list(&args.to_descriptor(), dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Images(args) => run_images(&args, dir).await,
        Commands::Credits(args) => run_credits(&args, dir).await,
        Commands::Reviews(args) => run_reviews(&args, dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Genres => run_genres(dir).await,
        Commands::Favorites(args) => run_favorites(&args, dir).await,
        Commands::Init(args) => run_init(&args, dir),
    }
}
