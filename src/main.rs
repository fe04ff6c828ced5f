use nu_plugin::{serve_plugin, MsgPackSerializer};
use nu_plugin_catmerge::CatmergePlugin;

fn main() {
    nu_plugin_catmerge::logging::init_tracing();
    serve_plugin(&CatmergePlugin, MsgPackSerializer {})
}
