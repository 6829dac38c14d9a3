use std::fs::File;
use std::os::raw::c_char;
use std::sync::Once;

use gl_context_fix_core::loader_interfaces::*;
use gl_context_fix_core::LayerConfig;
use log::{info, warn};
use openxr::sys as xr;
use simplelog::*;

const _: FnNegotiateLoaderApiLayerInterface = xrNegotiateLoaderApiLayerInterface;

static LOGGER_INIT: Once = Once::new();

fn init_logger(config: &LayerConfig) {
    LOGGER_INIT.call_once(|| {
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            config.log_level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];

        let mut file_error = None;
        if let Some(path) = &config.log_file {
            match File::create(path) {
                Ok(file) => {
                    loggers.push(WriteLogger::new(config.log_level, Config::default(), file))
                }
                Err(err) => file_error = Some((path.clone(), err)),
            }
        }

        // The application may have installed its own logger already.
        if CombinedLogger::init(loggers).is_ok() {
            if let Some((path, err)) = file_error {
                warn!("Could not create log file `{}`: {}", path.display(), err);
            }
        }
    });
}

#[no_mangle]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "system" fn xrNegotiateLoaderApiLayerInterface(
    negotiate_info: *const XrNegotiateLoaderInfo,
    layer_name: *const c_char,
    layer_request: *mut XrNegotiateApiLayerRequest,
) -> xr::Result {
    let layer = gl_context_fix_core::layer();
    init_logger(layer.config());

    info!("Initializing layer");

    layer.negotiate(negotiate_info, layer_name, layer_request)
}
