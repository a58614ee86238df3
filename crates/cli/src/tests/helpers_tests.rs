#[cfg(test)]
mod tests {
    use crate::cmd::helpers;
    use nsxcheck_common::EntityKind;
    use nsxcheck_engine::Levels;

    #[test]
    fn default_config_path_not_empty() {
        let path = helpers::default_config_path();
        assert!(path.ends_with("config.yml"));
    }

    #[test]
    fn load_config_missing_file() {
        let result = helpers::load_config(Some("/nonexistent/path.yml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_config_from_tempfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nsxcheck.yml");
        std::fs::write(&path, "certificates:\n  age_levels: [60, 30]\n").unwrap();

        let cfg = helpers::load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.certificates.age_levels, Some(Levels::new(60.0, 30.0)));
    }

    #[test]
    fn invalid_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "memory:\n  levels: [-5, 90]\n").unwrap();

        let err = helpers::load_config(Some(path.to_str().unwrap())).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("bad.yml"));
        assert!(msg.contains("memory.levels"));
    }

    #[test]
    fn node_arg_forms() {
        let n = helpers::parse_node_arg("mgr-1=/tmp/out.txt").unwrap();
        assert_eq!(n.collector_id, "mgr-1");
        let n = helpers::parse_node_arg("/tmp/mgr-2.txt").unwrap();
        assert_eq!(n.collector_id, "mgr-2");
        assert!(helpers::parse_node_arg("mgr-3=").is_err());
    }

    #[test]
    fn load_input_reads_each_node() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.out");
        let b = dir.path().join("b.out");
        std::fs::write(&a, "<<<nsx_loadbalancer>>>\nlb1 id-1 UP True\n").unwrap();
        std::fs::write(&b, "<<<nsx_loadbalancer>>>\nlb1 id-1 UP True\n<<<nsx_other>>>\nx\n").unwrap();

        let nodes = vec![
            helpers::parse_node_arg(a.to_str().unwrap()).unwrap(),
            helpers::parse_node_arg(b.to_str().unwrap()).unwrap(),
        ];
        let input = helpers::load_input(&nodes).unwrap();
        let kinds: Vec<_> = input.kinds().collect();
        assert_eq!(kinds, [EntityKind::LoadBalancers]);
        assert_eq!(input.get(EntityKind::LoadBalancers).unwrap().len(), 2);
    }

    #[test]
    fn duplicate_collector_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.out");
        std::fs::write(&a, "").unwrap();
        let node = helpers::parse_node_arg(a.to_str().unwrap()).unwrap();
        let err = helpers::load_input(&[node.clone(), node]).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn missing_output_file_is_error() {
        let node = helpers::parse_node_arg("x=/nonexistent/x.out").unwrap();
        assert!(helpers::load_input(&[node]).is_err());
    }

    #[test]
    fn resolve_now_uses_epoch() {
        let t = helpers::resolve_now(Some(1_700_000_000)).unwrap();
        assert_eq!(t.timestamp(), 1_700_000_000);
    }
}
