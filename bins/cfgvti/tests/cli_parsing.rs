//! CLI argument parsing tests for the cfgvti command.
//!
//! Every case here is rejected before a netlink socket is opened, so no
//! root privileges are needed.

use assert_cmd::Command;
use predicates::prelude::*;

fn cfgvti_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cfgvti"))
}

mod global_flags {
    use super::*;

    #[test]
    fn test_help() {
        cfgvti_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("VTI tunnel configuration tool"));
    }

    #[test]
    fn test_version() {
        cfgvti_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("cfgvti"));
    }

    #[test]
    fn test_missing_action() {
        cfgvti_cmd()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_invalid_action() {
        cfgvti_cmd()
            .arg("change")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}

mod add_command {
    use super::*;

    #[test]
    fn test_add_help() {
        cfgvti_cmd()
            .args(["add", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--key"))
            .stdout(predicate::str::contains("--remote"))
            .stdout(predicate::str::contains("--local"));
    }

    #[test]
    fn test_add_requires_name() {
        cfgvti_cmd()
            .args(["add", "--key", "5", "--remote", "10.0.0.2", "--local", "10.0.0.1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("<NAME>"));
    }

    #[test]
    fn test_add_requires_remote() {
        cfgvti_cmd()
            .args(["add", "vti1", "--key", "5", "--local", "10.0.0.1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--remote"));
    }

    #[test]
    fn test_add_invalid_key() {
        cfgvti_cmd()
            .args([
                "add", "vti1", "--key", "mark", "--remote", "10.0.0.2", "--local", "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid value for \"key\" mark"));
    }

    #[test]
    fn test_add_invalid_remote() {
        cfgvti_cmd()
            .args([
                "add", "vti1", "--key", "5", "--remote", "10.0.0", "--local", "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid \"remote\" address 10.0.0"));
    }

    #[test]
    fn test_add_ipv6_local() {
        cfgvti_cmd()
            .args([
                "add", "vti1", "--key", "5", "--remote", "10.0.0.2", "--local", "2001:db8::1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid \"local\" address"))
            .stderr(predicate::str::contains("IPv6 address not supported"));
    }

    #[test]
    fn test_add_zero_key() {
        cfgvti_cmd()
            .args([
                "add", "vti1", "--key", "0.0.0.0", "--remote", "10.0.0.2", "--local", "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid values for \"add\""));
    }

    #[test]
    fn test_add_unspecified_address() {
        cfgvti_cmd()
            .args([
                "add", "vti1", "--key", "5", "--remote", "0.0.0.0", "--local", "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid values for \"add\""));
    }

    #[test]
    fn test_add_name_too_long() {
        cfgvti_cmd()
            .args([
                "add",
                "vti-sixteen-chrs",
                "--key",
                "5",
                "--remote",
                "10.0.0.2",
                "--local",
                "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("interface name too long"));
    }
}

mod keyword_form {
    use super::*;

    #[test]
    fn test_keyword_add_is_validated() {
        cfgvti_cmd()
            .args([
                "add", "name", "vti1", "key", "0", "remote", "10.0.0.2", "local", "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid values for \"add\""));
    }

    #[test]
    fn test_keyword_invalid_remote() {
        cfgvti_cmd()
            .args([
                "add", "name", "vti1", "key", "5", "remote", "bogus", "local", "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid \"remote\" address bogus"));
    }

    #[test]
    fn test_keyword_name_too_long() {
        cfgvti_cmd()
            .args([
                "name",
                "vti-sixteen-chrs",
                "add",
                "key",
                "5",
                "remote",
                "10.0.0.2",
                "local",
                "10.0.0.1",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("interface name too long"));
    }

    #[test]
    fn test_keyword_del_rejected() {
        cfgvti_cmd()
            .args(["del", "name", "vti1"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid action \"del\""));
    }
}

mod del_command {
    use super::*;

    #[test]
    fn test_del_rejected() {
        cfgvti_cmd()
            .args(["del", "vti1"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid action \"del\""));
    }

    #[test]
    fn test_del_without_args_rejected() {
        cfgvti_cmd()
            .arg("del")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid action \"del\""));
    }
}
