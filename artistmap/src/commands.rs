use crate::CLAP_STYLING;
use artistmap_spotify::client::{DEFAULT_ACCOUNTS_BASE, DEFAULT_API_BASE};
use clap::builder::FalseyValueParser;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("artistmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("artistmap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log every API request").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("build")
                .about(
                    "Fetch a playlist, expand it through related artists and write the artist, \
                origin and genre tables.",
                )
                .arg(
                    arg!(--"client-id" <CLIENT_ID>)
                        .required(true)
                        .help("Spotify application client id")
                        .env("SPOTIFY_API_CLIENT_ID"),
                )
                .arg(
                    arg!(--"client-secret" <CLIENT_SECRET>)
                        .required(true)
                        .help("Spotify application client secret")
                        .env("SPOTIFY_API_CLIENT_SECRET")
                        .hide_env_values(true),
                )
                .arg(
                    arg!(-p --"playlist" <PLAYLIST_ID>)
                        .required(true)
                        .help("Id of the playlist to expand")
                        .env("SPOTIFY_PLAYLIST_ID"),
                )
                .arg(
                    arg!(-o --"output-dir" <PATH>)
                        .required(false)
                        .help("Directory the table files are written to")
                        .default_value("."),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Also write every table as tableN.json")
                        .env("DEVELOPMENT")
                        .action(clap::ArgAction::SetTrue)
                        .value_parser(FalseyValueParser::new()),
                )
                .arg(
                    arg!(--"no-playlist-genres")
                        .required(false)
                        .help("Skip playlist-artist genre lookups and their genre table (table3)")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"api-base" <URL>)
                        .required(false)
                        .help("Base URL of the Spotify Web API")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_API_BASE),
                )
                .arg(
                    arg!(--"accounts-base" <URL>)
                        .required(false)
                        .help("Base URL of the Spotify accounts service")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_ACCOUNTS_BASE),
                ),
        )
}
