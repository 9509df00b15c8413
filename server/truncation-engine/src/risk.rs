//! File risk tiers derived from path patterns.
//!
//! Precedence (first match wins): critical, high, dependency manifests
//! (medium), low (tests/docs/generated/tooling), then the medium default.
//! Critical and high run before the low exclusions so a test fixture under
//! `auth/` or a CI workflow named `test.yml` keeps its higher tier.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRiskLevel {
  Low,
  Medium,
  High,
  Critical,
}

impl FileRiskLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
      Self::Critical => "critical",
    }
  }
}

impl std::fmt::Display for FileRiskLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Classify a changed file by its path. Total and deterministic.
pub fn classify_file_risk(filename: &str) -> FileRiskLevel {
  let path = normalize_path(filename);
  let base = path.rsplit('/').next().unwrap_or(&path);
  let tokens: Vec<&str> = path
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter(|t| !t.is_empty())
    .collect();

  if is_critical(&path, base, &tokens) {
    FileRiskLevel::Critical
  } else if is_high(&path, base, &tokens) {
    FileRiskLevel::High
  } else if is_dependency_manifest(base) {
    FileRiskLevel::Medium
  } else if is_low(&path, base, &tokens) {
    FileRiskLevel::Low
  } else {
    FileRiskLevel::Medium
  }
}

fn is_critical(path: &str, base: &str, tokens: &[&str]) -> bool {
  const EXACT: &[&str] = &[
    "auth", "authn", "authz", "oauth", "oauth2", "jwt", "jwks", "saml", "sso", "rbac", "acl",
    "acls", "token", "tokens", "schema", "schemas", "migrate", "migrations", "migration",
  ];
  const PREFIXES: &[&str] = &[
    "authenticat", "authoriz", "credential", "permission", "password", "passwd", "secret",
    "migration",
  ];
  const EXTENSIONS: &[&str] = &[".sql", ".proto", ".graphql", ".gql", ".prisma"];

  if EXTENSIONS.iter().any(|ext| base.ends_with(ext)) {
    return true;
  }
  if path.contains("openapi") || path.contains("swagger") {
    return true;
  }
  tokens.iter().any(|t| {
    EXACT.contains(t)
      || PREFIXES.iter().any(|p| t.starts_with(p))
      // camelCase names lowercase into one token: "authservice", "authmiddleware".
      || (t.starts_with("auth") && !t.starts_with("author"))
  })
}

fn is_high(path: &str, base: &str, tokens: &[&str]) -> bool {
  const DIRS: &[&str] = &[
    ".github/workflows/",
    ".circleci/",
    ".buildkite/",
    "k8s/",
    "kubernetes/",
    "helm/",
    "terraform/",
    "ansible/",
    "pulumi/",
    "cloudformation/",
    "deployment/",
    "deployments/",
    "infra/",
    "infrastructure/",
  ];
  const NAMES: &[&str] = &[
    "jenkinsfile",
    "procfile",
    ".gitlab-ci.yml",
    "azure-pipelines.yml",
    "bitbucket-pipelines.yml",
    "cloudbuild.yaml",
    "chart.yaml",
    "kustomization.yaml",
    "kustomization.yml",
    "serverless.yml",
    "skaffold.yaml",
    "fly.toml",
    "app.yaml",
  ];
  // Common names for UI folders too; only infra at the repository root.
  const ROOT_DIRS: &[&str] = &["charts/", "deploy/"];
  const EXTENSIONS: &[&str] = &[".tf", ".tfvars", ".hcl", ".dockerfile"];

  let in_dir = DIRS
    .iter()
    .any(|d| path.starts_with(d) || path.contains(&format!("/{}", d)));
  in_dir
    || ROOT_DIRS.iter().any(|d| path.starts_with(d))
    || NAMES.contains(&base)
    || EXTENSIONS.iter().any(|ext| base.ends_with(ext))
    || base == "dockerfile"
    || base.starts_with("dockerfile.")
    || base.starts_with("docker-compose")
    || base.starts_with("compose.y")
    || tokens.contains(&"containerfile")
}

fn is_dependency_manifest(base: &str) -> bool {
  const NAMES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "cargo.toml",
    "cargo.lock",
    "go.mod",
    "go.sum",
    "pipfile",
    "pipfile.lock",
    "poetry.lock",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "gemfile",
    "gemfile.lock",
    "composer.json",
    "composer.lock",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "mix.exs",
    "mix.lock",
  ];
  NAMES.contains(&base) || (base.starts_with("requirements") && base.ends_with(".txt"))
}

fn is_low(path: &str, base: &str, tokens: &[&str]) -> bool {
  is_test(base, tokens) || is_doc(path, base) || is_generated(path, base) || is_tooling(path, base)
}

fn is_test(base: &str, tokens: &[&str]) -> bool {
  const TOKENS: &[&str] = &[
    "test", "tests", "spec", "specs", "testdata", "testing", "fixture", "fixtures", "mock",
    "mocks", "e2e",
  ];
  tokens.iter().any(|t| TOKENS.contains(t))
    || base.contains("_test.")
    || base.contains(".test.")
    || base.contains(".spec.")
    || base.starts_with("test_")
}

fn is_doc(path: &str, base: &str) -> bool {
  const EXTENSIONS: &[&str] = &[".md", ".mdx", ".rst", ".adoc"];
  const NAMES: &[&str] = &["license", "changelog", "authors", "contributors", "notice", "readme"];
  EXTENSIONS.iter().any(|ext| base.ends_with(ext))
    || NAMES.iter().any(|n| base == *n || base.starts_with(&format!("{}.", n)))
    || path.starts_with("docs/")
    || path.starts_with("doc/")
    || path.contains("/docs/")
    || path.contains("/doc/")
}

fn is_generated(path: &str, base: &str) -> bool {
  const MARKERS: &[&str] = &[".min.js", ".min.css", ".pb.go", "_pb2.py", ".generated.", ".g.dart"];
  const SUFFIXES: &[&str] = &[".snap", ".map", ".lock.json"];
  const DIRS: &[&str] = &["generated/", "vendor/", "dist/", "node_modules/", "__generated__/"];
  MARKERS.iter().any(|m| base.contains(m))
    || SUFFIXES.iter().any(|s| base.ends_with(s))
    || DIRS
      .iter()
      .any(|d| path.starts_with(d) || path.contains(&format!("/{}", d)))
}

fn is_tooling(path: &str, base: &str) -> bool {
  const DIRS: &[&str] = &[".vscode/", ".idea/", ".devcontainer/", ".husky/"];
  const NAMES: &[&str] = &[
    ".editorconfig",
    ".gitignore",
    ".gitattributes",
    ".npmrc",
    ".nvmrc",
    ".prettierignore",
    ".eslintignore",
    ".dockerignore",
    ".tool-versions",
    "rustfmt.toml",
    ".rustfmt.toml",
    "clippy.toml",
  ];
  DIRS.iter().any(|d| path.starts_with(d) || path.contains(&format!("/{}", d)))
    || NAMES.contains(&base)
    || base.starts_with(".prettierrc")
    || base.starts_with(".eslintrc")
    || base.starts_with(".stylelintrc")
    || base.starts_with(".markdownlint")
}

/// Normalize a path for matching:
/// - backslash -> forward slash
/// - collapse repeated slashes
/// - strip leading ./
/// - lowercase
fn normalize_path(p: &str) -> String {
  let s = p.replace('\\', "/");
  let mut out = String::with_capacity(s.len());
  let mut prev_slash = false;
  for ch in s.chars() {
    if ch == '/' {
      if !prev_slash {
        out.push('/');
      }
      prev_slash = true;
    } else {
      prev_slash = false;
      out.push(ch);
    }
  }
  let trimmed = out.strip_prefix("./").unwrap_or(&out);
  trimmed.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_path_basics() {
    assert_eq!(normalize_path("src\\auth\\jwt.go"), "src/auth/jwt.go");
    assert_eq!(normalize_path("./src//utils/index.ts"), "src/utils/index.ts");
    assert_eq!(normalize_path("SRC/App.tsx"), "src/app.tsx");
  }

  #[test]
  fn critical_paths() {
    for path in [
      "db/migrations/001_init.sql",
      "prisma/schema.prisma",
      "src/auth/session.go",
      "internal/AuthService.ts",
      "pkg/credentials/store.go",
      "app/permissions.py",
      "api/openapi.yaml",
      "proto/user.proto",
      "graphql/schema.graphql",
      "config/secrets.yaml",
    ] {
      assert_eq!(classify_file_risk(path), FileRiskLevel::Critical, "{}", path);
    }
  }

  #[test]
  fn high_paths() {
    for path in [
      "Dockerfile",
      "build/Dockerfile.prod",
      "docker-compose.yml",
      "infra/main.tf",
      ".github/workflows/release.yml",
      ".gitlab-ci.yml",
      "Jenkinsfile",
      "k8s/deployment.yaml",
      "charts/api/Chart.yaml",
      "charts/api/values.yaml",
      "deploy/prod.yaml",
      "ops/helm/charts/api/values.yaml",
    ] {
      assert_eq!(classify_file_risk(path), FileRiskLevel::High, "{}", path);
    }
  }

  #[test]
  fn nested_charts_and_deploy_dirs_are_not_infra() {
    assert_eq!(
      classify_file_risk("src/components/charts/BarChart.tsx"),
      FileRiskLevel::Medium
    );
    assert_eq!(classify_file_risk("web/src/deploy/Button.tsx"), FileRiskLevel::Medium);
  }

  #[test]
  fn dependency_manifests_are_medium() {
    for path in [
      "package.json",
      "package-lock.json",
      "Cargo.lock",
      "go.sum",
      "requirements-dev.txt",
      "web/yarn.lock",
    ] {
      assert_eq!(classify_file_risk(path), FileRiskLevel::Medium, "{}", path);
    }
  }

  #[test]
  fn low_paths() {
    for path in [
      "src/handler_test.go",
      "tests/integration.rs",
      "web/components/Button.test.tsx",
      "README.md",
      "docs/guide/setup.html",
      "static/app.min.js",
      "gen/api.pb.go",
      ".vscode/settings.json",
      ".editorconfig",
      "AUTHORS",
    ] {
      assert_eq!(classify_file_risk(path), FileRiskLevel::Low, "{}", path);
    }
  }

  #[test]
  fn ordinary_source_defaults_to_medium() {
    assert_eq!(classify_file_risk("src/handler.rs"), FileRiskLevel::Medium);
    assert_eq!(classify_file_risk("lib/utils/format.ts"), FileRiskLevel::Medium);
    assert_eq!(classify_file_risk(""), FileRiskLevel::Medium);
  }

  #[test]
  fn overlapping_patterns_use_declared_precedence() {
    // Critical beats test / generated.
    assert_eq!(classify_file_risk("tests/auth/login_test.go"), FileRiskLevel::Critical);
    assert_eq!(classify_file_risk("src/generated/auth_pb.go"), FileRiskLevel::Critical);
    // High beats test.
    assert_eq!(classify_file_risk(".github/workflows/test.yml"), FileRiskLevel::High);
    // Critical beats high.
    assert_eq!(classify_file_risk("deploy/migrations/002.sql"), FileRiskLevel::Critical);
    // Dependency manifest beats tooling/test heuristics.
    assert_eq!(classify_file_risk("e2e/package.json"), FileRiskLevel::Medium);
  }

  #[test]
  fn author_is_not_auth() {
    assert_eq!(classify_file_risk("src/authors/list.rs"), FileRiskLevel::Medium);
  }
}
