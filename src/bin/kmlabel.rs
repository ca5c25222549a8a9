//! Classifies unlabeled data with labels propagated from k-means clusters of labeled data.
//!
//! Usage : kmlabel --train classified.txt --test unclassified.txt [--output output.txt] [--nbcluster k]
//!
//!  * --nbcluster k : number of centroids. If absent it is asked interactively.
//!  * --features n : number of feature columns (default 6), training rows have one more column for the label
//!  * --tolerance eps : stop when no centroid coordinate moves more than eps. Default is exact convergence.
//!  * --maxiter n : maximum number of iterations (default 300)
//!  * --empty "hold" or "fail" : what to do with a centroid without member
//!  * --centroids file : dump final centroids in csv format
//!  * --reference file : label file to compare the output with
//!  * --quiet : do not print centroids at each iteration
//!
//! Centroids are printed on stdout at the start of each iteration, followed by a separator line, unless --quiet is given.
//! The log level is driven by RUST_LOG.

use anyhow::anyhow;

use clap::{Arg, ArgAction, ArgMatches, Command};
use dialoguer::Input;

use cpu_time::ProcessTime;
use std::path::PathBuf;
use std::time::SystemTime;

use kmlabel::data::{DataSource, NB_FEATURES, read_labels, write_labels};
use kmlabel::kmeans::{Convergence, DEFAULT_MAX_ITER, EmptyClusterPolicy, KMeans, KMeansParams};
use kmlabel::merit::{Contingency, VecAffectation};

fn get_cmd() -> Command {
    Command::new("kmlabel")
        .about("propagates k-means cluster labels to unlabeled data")
        .arg(
            Arg::new("train")
                .long("train")
                .required(true)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("training file, features then label 0 or 1 on each line"),
        )
        .arg(
            Arg::new("test")
                .long("test")
                .required(true)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("file of data to classify"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("output.txt")
                .help("output label file"),
        )
        .arg(
            Arg::new("nbcluster")
                .long("nbcluster")
                .short('k')
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .help("number of centroids"),
        )
        .arg(
            Arg::new("features")
                .long("features")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .default_value("6")
                .help("number of feature columns"),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .help("convergence tolerance, exact convergence if absent"),
        )
        .arg(
            Arg::new("maxiter")
                .long("maxiter")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .default_value("300")
                .help("maximum number of iterations"),
        )
        .arg(
            Arg::new("empty")
                .long("empty")
                .action(ArgAction::Set)
                .value_parser(["hold", "fail"])
                .default_value("hold")
                .help("policy for centroids without member"),
        )
        .arg(
            Arg::new("centroids")
                .long("centroids")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("csv file to dump final centroids"),
        )
        .arg(
            Arg::new("reference")
                .long("reference")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("expected labels, to evaluate the output"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("do not print centroids at each iteration"),
        )
}

// asks k on the terminal
fn ask_nb_cluster() -> anyhow::Result<usize> {
    let k: usize = Input::new()
        .with_prompt("Type number of centroids")
        .validate_with(|k: &usize| -> std::result::Result<(), &str> {
            if *k == 0 {
                Err("number of centroids must be positive")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(k)
}

fn get_params(matches: &ArgMatches, nb_cluster: usize) -> KMeansParams<f64> {
    let convergence = match matches.get_one::<f64>("tolerance") {
        Some(eps) => Convergence::Tolerance(*eps),
        None => Convergence::Exact,
    };
    let empty_cluster = match matches.get_one::<String>("empty").map(|s| s.as_str()) {
        Some("fail") => EmptyClusterPolicy::Fail,
        _ => EmptyClusterPolicy::HoldPosition,
    };
    KMeansParams::new(nb_cluster)
        .convergence(convergence)
        .max_iter(*matches.get_one::<usize>("maxiter").unwrap_or(&DEFAULT_MAX_ITER))
        .empty_cluster(empty_cluster)
        .trace(!matches.get_flag("quiet"))
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let train_path = matches
        .get_one::<PathBuf>("train")
        .ok_or_else(|| anyhow!("missing training file"))?;
    let test_path = matches
        .get_one::<PathBuf>("test")
        .ok_or_else(|| anyhow!("missing test file"))?;
    let output = matches
        .get_one::<PathBuf>("output")
        .ok_or_else(|| anyhow!("missing output file"))?;
    let nb_features = *matches.get_one::<usize>("features").unwrap_or(&NB_FEATURES);
    //
    let source = DataSource::new(nb_features);
    let training = source.load_labeled::<f64>(train_path)?;
    let test = source.load_unlabeled::<f64>(test_path)?;
    //
    let nb_cluster = match matches.get_one::<usize>("nbcluster") {
        Some(k) => *k,
        None => ask_nb_cluster()?,
    };
    let params = get_params(matches, nb_cluster);
    log::info!("parameters : {:?}", params);
    //
    let cpu_start = ProcessTime::now();
    let sys_now = SystemTime::now();
    let mut kmeans = KMeans::new(params, &training)?;
    let report = kmeans.fit(&training)?;
    let labels = kmeans.predict(&test)?;
    println!(
        "kmeans nb iterations : {}, converged : {}, sys time(ms) {:?} cpu time(ms) {:?}",
        report.nb_iter,
        report.converged,
        sys_now.elapsed()?.as_millis(),
        cpu_start.elapsed().as_millis()
    );
    //
    write_labels(output, &labels)?;
    if let Some(path) = matches.get_one::<PathBuf>("centroids") {
        kmeans.dump_centroids_csv(path)?;
    }
    //
    if let Some(path) = matches.get_one::<PathBuf>("reference") {
        let reference = read_labels(path)?;
        let contingency = Contingency::<VecAffectation<u32>, usize, u32>::new(
            VecAffectation::with_nb_label(&reference, 2),
            VecAffectation::with_nb_label(&labels, 2),
        )?;
        contingency.dump();
        println!("accuracy against reference : {:.3e}", contingency.get_accuracy());
    }
    Ok(())
} // end of run

pub fn main() {
    //
    kmlabel::install_logger();
    //
    let matches = get_cmd().get_matches();
    if let Err(e) = run(&matches) {
        log::error!("kmlabel failed : {:#}", e);
        eprintln!("error : {:#}", e);
        std::process::exit(1);
    }
} // end of main
