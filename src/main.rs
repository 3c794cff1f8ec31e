use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use constancias::cli;
use constancias::config::{Config, ConfigOverrides};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "constancias")]
#[command(about = "Genera constancias (.docx) a partir de un archivo Excel")]
#[command(long_about = "Constancias - certificados por lotes desde Excel

Cada fila del Excel produce un documento a partir de la plantilla Word,
reemplazando los campos {{NOMBRE}}, {{TIPO_DE_DOCUMENTO}},
{{NUMERO_IDENTIFICACION}}, {{NOMBRE DEL PROGRAMA}}, {{NUMERO_FICHA}},
{{FECHA_ONE}}..{{FECHA_FOUR}}, {{interesar}} y {{DIA_REALIZA}}.

COMMANDS:
  generar    - Generar una constancia por fila del Excel
  plantilla  - Crear el Excel vacío con las columnas requeridas
  campos     - Listar los campos de la plantilla Word
  rutas      - Mostrar las rutas en uso

COLUMNAS REQUERIDAS:
  nombre, tipo, id, programa, ficha, fecha1, fecha2, fecha3, fecha4, interesar

EXAMPLES:
  constancias plantilla
  constancias generar datos.xlsx
  constancias generar datos.xlsx --salida ./constancias --fecha 2025-06-01")]
#[command(version)]
struct Cli {
    /// Plantilla Word con los campos {{...}}
    #[arg(long = "plantilla-docx", global = true, env = "CONSTANCIAS_TEMPLATE")]
    template: Option<PathBuf>,

    /// Carpeta donde se guardan las constancias
    #[arg(long = "salida", global = true, env = "CONSTANCIAS_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Carpeta de descargas para la plantilla Excel
    #[arg(long = "descargas", global = true, env = "CONSTANCIAS_DOWNLOADS_DIR")]
    downloads_dir: Option<PathBuf>,

    /// Fecha de emisión (YYYY-MM-DD) para {{DIA_REALIZA}}; por defecto hoy
    #[arg(long = "fecha", global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generar una constancia por cada fila del Excel
    #[command(alias = "generate")]
    Generar {
        /// Archivo Excel (.xlsx, .xls, .ods)
        excel: PathBuf,

        /// Imprimir el resultado como JSON
        #[arg(long)]
        json: bool,
    },

    /// Crear la plantilla Excel vacía con las columnas requeridas
    #[command(alias = "template")]
    Plantilla {
        /// Ruta de destino (por defecto la carpeta de descargas)
        #[arg(short, long)]
        destino: Option<PathBuf>,
    },

    /// Listar los campos {{...}} de la plantilla Word
    #[command(alias = "fields")]
    Campos,

    /// Mostrar las rutas de trabajo
    #[command(alias = "paths")]
    Rutas,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("fecha inválida '{}': {}", s, e))
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "constancias=debug"
    } else {
        "constancias=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::resolve(ConfigOverrides {
        template_path: cli.template,
        output_dir: cli.output_dir,
        downloads_dir: cli.downloads_dir,
        today: cli.today,
    });

    match cli.command {
        Commands::Generar { excel, json } => {
            cli::generate(&config, excel.clone(), json)
                .with_context(|| format!("no se generaron constancias desde {}", excel.display()))?;
        }
        Commands::Plantilla { destino } => {
            cli::template(&config, destino).context("no se pudo crear la plantilla Excel")?;
        }
        Commands::Campos => {
            cli::fields(&config).context("no se pudo leer la plantilla Word")?;
        }
        Commands::Rutas => cli::paths(&config)?,
    }

    Ok(())
}
