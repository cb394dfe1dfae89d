//! Pack fixtures for E2E tests
//!
//! Text of the records packwiz writes, plus a shell stand-in for packwiz
//! that edits a pack directory the way the real tool does: metafiles are
//! written or deleted, then the index is rebuilt from disk and its hash is
//! stamped into `pack.toml`.

/// Manifest text for a pack on a single loader
pub fn pack_toml(name: &str, minecraft_version: &str, loader: &str, loader_version: &str) -> String {
    format!(
        r#"name = "{name}"
author = "Test Author"
version = "1.0.0"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = ""

[versions]
minecraft = "{minecraft_version}"
{loader} = "{loader_version}"
"#
    )
}

/// Empty index
pub const EMPTY_INDEX: &str = "hash-format = \"sha256\"\n";

/// Modrinth metafile for `slug` at `version`
pub fn modrinth_metafile(slug: &str, version: &str) -> String {
    format!(
        r#"name = "{slug}"
filename = "{slug}-{version}.jar"
side = "both"

[download]
url = "https://cdn.modrinth.com/data/{slug}/versions/{version}/{slug}-{version}.jar"
hash-format = "sha512"
hash = "00"

[update.modrinth]
mod-id = "{slug}"
version = "{version}"
"#
    )
}

/// Body of the packwiz stand-in
///
/// Handles `init`, `modrinth add`, `url add`, `remove`, `update -a` and
/// `refresh`. Anything else succeeds without touching the pack.
pub const PACKWIZ_SIMULATOR: &str = r#"
rebuild_index() {
  find . -type f ! -name pack.toml ! -name index.toml ! -name '*.tmp' \
    | sed 's|^\./||' | LC_ALL=C sort > files.tmp
  {
    echo 'hash-format = "sha256"'
    while read -r file; do
      echo
      echo '[[files]]'
      echo "file = \"$file\""
      echo "hash = \"$(cksum < "$file" | cut -d' ' -f1)\""
      case "$file" in *.pw.toml) echo 'metafile = true' ;; esac
    done < files.tmp
  } > index.toml.tmp
  rm files.tmp
  mv index.toml.tmp index.toml
  hash="$(cksum < index.toml | cut -d' ' -f1)"
  sed "s/^hash = .*/hash = \"$hash\"/" pack.toml > pack.toml.tmp
  mv pack.toml.tmp pack.toml
}

write_modrinth() {
  mkdir -p mods
  cat > "mods/$1.pw.toml" <<META
name = "$1"
filename = "$1-$2.jar"
side = "both"

[download]
url = "https://cdn.modrinth.com/data/$1/versions/$2/$1-$2.jar"
hash-format = "sha512"
hash = "00"

[update.modrinth]
mod-id = "$1"
version = "$2"
META
}

case "$1" in
  --help)
    exit 0
    ;;
  init)
    shift
    while [ $# -gt 0 ]; do
      case "$1" in
        --name) name="$2"; shift 2 ;;
        --author) author="$2"; shift 2 ;;
        --version) version="$2"; shift 2 ;;
        --mc-version) mc="$2"; shift 2 ;;
        --modloader) loader="$2"; shift 2 ;;
        *) shift ;;
      esac
    done
    cat > pack.toml <<PACK
name = "$name"
author = "$author"
version = "$version"
pack-format = "packwiz:1.1.0"

[index]
file = "index.toml"
hash-format = "sha256"
hash = ""

[versions]
minecraft = "$mc"
$loader = "0.15.0"
PACK
    rebuild_index
    ;;
  modrinth)
    if [ "$2" = "add" ]; then
      case "$3" in
        missing-*) echo "No projects found for $3"; exit 1 ;;
      esac
      write_modrinth "$3" "1.0.0"
      rebuild_index
    fi
    ;;
  url)
    if [ "$2" = "add" ]; then
      mkdir -p mods
      cat > "mods/$3.pw.toml" <<META
name = "$3"
filename = "$3.jar"

[download]
url = "$4"
hash-format = "sha256"
hash = "00"
META
      rebuild_index
    fi
    ;;
  remove)
    rm -f "mods/$2.pw.toml" "resourcepacks/$2.pw.toml"
    rebuild_index
    ;;
  update)
    for meta in mods/*.pw.toml; do
      [ -e "$meta" ] || continue
      slug="$(basename "$meta" .pw.toml)"
      write_modrinth "$slug" "2.0.0"
    done
    rebuild_index
    ;;
  refresh)
    rebuild_index
    ;;
esac
exit 0
"#;
