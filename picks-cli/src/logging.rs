use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Installe le journal sur stderr.
///
/// `PICKS_LOG` prend le pas sur le niveau par défaut (`info`, ou `debug` en mode debug).
pub fn init_tracing(debug: bool) {
    INIT.call_once(|| {
        let default = if debug {
            "picks=debug,picks_engine=debug"
        } else {
            "picks=info,picks_engine=info"
        };
        let filter = EnvFilter::try_from_env("PICKS_LOG").unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
