pub fn index_html() -> &'static str {
    include_str!("../static/index.html")
}

pub fn styles_css() -> &'static str {
    include_str!("../static/styles.css")
}

pub fn app_js() -> &'static str {
    include_str!("../static/app.js")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_bundle_contains_index_html() {
        let html = index_html();

        assert!(html.contains("<!doctype html>"));
        assert!(html.contains("/static/styles.css"));
        assert!(html.contains("/static/app.js"));
    }

    #[test]
    fn ui_shell_contains_trading_panels() {
        let html = index_html();
        assert!(html.contains("Your Position"));
        assert!(html.contains("trade-form"));
        assert!(html.contains("<canvas id=\"chart\""));
    }

    #[test]
    fn client_script_speaks_the_socket_events() {
        let js = app_js();
        for event in ["stock_info", "stock_update", "position_update", "trade_result"] {
            assert!(js.contains(event), "app.js should handle {event}");
        }
        assert!(js.contains("/api/stock/history"));
        assert!(!styles_css().is_empty());
    }
}
