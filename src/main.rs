use anyhow::{anyhow, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sales_reports::core::{BusinessIdentity, ReportConfig};
use sales_reports::insights::{format_soles, provider_from_config, tax_calendar, COMPLIANCE_TIPS};
use sales_reports::provider::{SqliteProvider, DEFAULT_RANKING_LIMIT};
use sales_reports::reports::{ArtifactStore, ReportEngine, SalesReportData};
use sales_reports::excel::ReportStyle;

/// Generador de reportes contables en Excel
#[derive(Parser)]
#[command(
    name = "reportes",
    version,
    about = "Generador de reportes de ventas y tributarios",
    long_about = "Genera libros Excel con el reporte de ventas (cinco hojas con gráficos) \
                  y la declaración mensual de IGV a partir de la base de facturación."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reporte de ventas con resumen ejecutivo, documentos, resumen mensual y rankings
    Sales(SalesArgs),
    /// Reporte tributario del mes
    Tax(TaxArgs),
    /// Solo análisis en consola, sin generar Excel
    Analysis(AnalysisArgs),
    /// Calendario tributario del mes y recomendaciones SUNAT
    Calendar,
    /// Lista los reportes generados
    List,
}

#[derive(Args)]
struct SalesArgs {
    /// ID del negocio
    #[arg(long, short = 'b')]
    business_id: i64,
    /// Fecha de inicio (YYYY-MM-DD)
    #[arg(long, short = 's')]
    start_date: Option<String>,
    /// Fecha de fin (YYYY-MM-DD)
    #[arg(long, short = 'e')]
    end_date: Option<String>,
    /// Año del resumen mensual (por defecto el actual)
    #[arg(long, short = 'y')]
    year: Option<i32>,
    /// Nombre del archivo de salida
    #[arg(long, short = 'o')]
    output: Option<String>,
}

#[derive(Args)]
struct TaxArgs {
    /// ID del negocio
    #[arg(long, short = 'b')]
    business_id: i64,
    /// Año del periodo (por defecto el actual)
    #[arg(long, short = 'y')]
    year: Option<i32>,
    /// Mes del periodo, 1 a 12 (por defecto el actual)
    #[arg(long, short = 'm', value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Nombre del archivo de salida
    #[arg(long, short = 'o')]
    output: Option<String>,
}

#[derive(Args)]
struct AnalysisArgs {
    /// ID del negocio
    #[arg(long, short = 'b')]
    business_id: i64,
    /// Año a analizar (por defecto el actual)
    #[arg(long, short = 'y')]
    year: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let config = ReportConfig::from_env()?;
    let store = ArtifactStore::open(&config.reports_dir)?;
    let engine = ReportEngine::new(store, ReportStyle::default());

    match cli.command {
        Commands::Sales(args) => run_sales(&config, &engine, args).await,
        Commands::Tax(args) => run_tax(&config, &engine, args).await,
        Commands::Analysis(args) => run_analysis(&config, args).await,
        Commands::Calendar => run_calendar(),
        Commands::List => run_list(&engine),
    }
}

async fn load_business(provider: &SqliteProvider, business_id: i64) -> Result<BusinessIdentity> {
    provider
        .business(business_id)
        .await?
        .ok_or_else(|| anyhow!("No se encontró el negocio con ID {}", business_id))
}

async fn run_sales(config: &ReportConfig, engine: &ReportEngine, args: SalesArgs) -> Result<()> {
    let provider = SqliteProvider::connect(&config.database_url).await?;
    let business = load_business(&provider, args.business_id).await?;
    let year = args.year.unwrap_or_else(|| Local::now().year());

    let documents = provider
        .documents(args.business_id, args.start_date.as_deref(), args.end_date.as_deref())
        .await?;
    let monthly = provider.monthly_summary(args.business_id, Some(year)).await?;
    let top_clients = provider.top_clients(args.business_id, DEFAULT_RANKING_LIMIT).await?;
    let top_products = provider.top_products(args.business_id, DEFAULT_RANKING_LIMIT).await?;

    println!("Negocio: {}", business.display_name());
    println!("Documentos encontrados: {}", documents.len());

    let insights = provider_from_config(config)?;
    let analysis = insights.analyze(business.display_name(), &monthly).await;

    let data = SalesReportData {
        business: &business,
        documents: &documents,
        monthly_summary: &monthly,
        top_clients: &top_clients,
        top_products: &top_products,
        analysis: Some(&analysis),
    };
    let path = engine.generate_sales_report(&data, args.output.as_deref())?;
    println!("✅ Reporte generado: {}", path.display());

    if analysis.model_generated {
        println!("\n🤖 Insights de IA:");
        for insight in analysis.insights.iter().take(3) {
            println!("   • {}", insight);
        }
    }
    Ok(())
}

async fn run_tax(config: &ReportConfig, engine: &ReportEngine, args: TaxArgs) -> Result<()> {
    let provider = SqliteProvider::connect(&config.database_url).await?;
    let business = load_business(&provider, args.business_id).await?;
    let now = Local::now();
    let year = args.year.unwrap_or_else(|| now.year());
    let month = args.month.unwrap_or_else(|| now.month());

    let documents = provider.documents(args.business_id, None, None).await?;
    let path = engine.generate_tax_report(&business, &documents, year, month, args.output.as_deref())?;
    println!("✅ Reporte tributario generado: {}", path.display());
    Ok(())
}

async fn run_analysis(config: &ReportConfig, args: AnalysisArgs) -> Result<()> {
    let provider = SqliteProvider::connect(&config.database_url).await?;
    let business = load_business(&provider, args.business_id).await?;
    let year = args.year.unwrap_or_else(|| Local::now().year());

    let monthly = provider.monthly_summary(args.business_id, Some(year)).await?;
    let clients = provider.clients(args.business_id).await?;
    let top_clients = provider.top_clients(args.business_id, DEFAULT_RANKING_LIMIT).await?;

    let insights = provider_from_config(config)?;
    let analysis = insights.analyze(business.display_name(), &monthly).await;
    let client_analysis = insights.analyze_clients(&clients, &top_clients).await;

    println!("\n📊 ANÁLISIS DE VENTAS");
    println!("{}", "=".repeat(50));
    println!("Total Ventas: {}", format_soles(analysis.summary.total_sales));
    println!("Promedio Mensual: {}", format_soles(analysis.summary.average_monthly_sales));
    println!("Total Documentos: {}", analysis.summary.document_count);
    println!("Tendencia: {}", analysis.summary.trend);

    print_list("\n💡 INSIGHTS:", &analysis.insights);
    print_list("\n📋 RECOMENDACIONES:", &analysis.recommendations);

    println!("\n👥 ANÁLISIS DE CLIENTES");
    println!("{}", "=".repeat(50));
    println!("Total Clientes: {}", client_analysis.summary.total_clients);
    println!("Empresas (RUC): {}", client_analysis.summary.business_clients);
    println!("Personas: {}", client_analysis.summary.individual_clients);

    if client_analysis.model_generated {
        print_list("\n💡 INSIGHTS DE CLIENTES:", &client_analysis.insights);
        print_list("\n🤝 ESTRATEGIAS DE RETENCIÓN:", &client_analysis.retention_strategies);
        print_list("\n🚀 OPORTUNIDADES:", &client_analysis.opportunities);
    }

    if !top_clients.is_empty() {
        println!("\n🏆 TOP CLIENTES:");
        for client in top_clients.iter().take(5) {
            println!(
                "   • {}: {} ({} compras)",
                client.name,
                format_soles(client.total_amount),
                client.purchase_count
            );
        }
    }
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", title);
    for item in items {
        println!("   • {}", item);
    }
}

fn run_calendar() -> Result<()> {
    println!("\n📅 CALENDARIO TRIBUTARIO");
    println!("{}", "=".repeat(50));
    for entry in tax_calendar(Local::now().date_naive()) {
        println!("{}: {}", entry.due, entry.obligation);
        println!("   {}", entry.description);
    }

    println!("\n📌 RECOMENDACIONES SUNAT");
    for tip in COMPLIANCE_TIPS {
        println!("   {}", tip);
    }
    Ok(())
}

fn run_list(engine: &ReportEngine) -> Result<()> {
    let reports = engine.store().list()?;
    if reports.is_empty() {
        println!("No hay reportes en {}", engine.store().dir().display());
        return Ok(());
    }
    for report in reports {
        println!(
            "{}  {:>10.2} KB  {}",
            report.modified.format("%Y-%m-%d %H:%M:%S"),
            report.size_kb,
            report.filename
        );
    }
    Ok(())
}
