use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-budget",
    about = "Batch-convert images and downsize them to fit a byte budget",
    long_about = "img-budget converts a directory of images to a common format and lowers their \
                  resolution so that every file fits a per-file size budget, or so that the whole \
                  batch fits a total budget split evenly across files. Each image's compressibility \
                  is estimated from a lossless PNG copy and used to pick new dimensions that keep \
                  the aspect ratio.",
    version,
    after_help = "EXAMPLES:\n  \
    img-budget reduce ./photos ./small\n  \
    img-budget reduce ./photos ./small -b 5000 -r\n  \
    img-budget reduce ./photos ./small -f 200 -o jpeg\n  \
    img-budget info photo.jpg -f 200"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short, long, global = true, help = "Print a line for every image")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Convert and downsize every image in a directory",
        long_about = "Discover .jpg, .jpeg, .png and .gif files in the input directory, convert them \
                      to the output format and shrink any that exceed the effective per-file budget. \
                      Files that cannot be decoded are skipped."
    )]
    Reduce {
        #[arg(help = "Input directory")]
        input: String,

        #[arg(help = "Output directory (created if missing)")]
        output: String,

        #[arg(
            short = 'b',
            long,
            value_name = "KB",
            help = "Total size budget for the batch in KB (default: 50000)",
            long_help = "Maximum size of the whole output in kilobytes (1 KB = 1000 bytes), \
                         split evenly across the images that decode successfully. \
                         Ignored when --filesize is set."
        )]
        budget: Option<u64>,

        #[arg(
            short = 'f',
            long,
            value_name = "KB",
            help = "Maximum size of a single file in KB; overrides --budget",
            long_help = "Per-file ceiling in kilobytes (1 KB = 1000 bytes). \
                         Any nonzero value ignores --budget entirely. 0 means unset."
        )]
        filesize: Option<u64>,

        #[arg(
            short = 'r',
            long,
            help = "Search subdirectories recursively",
            long_help = "Also pick up images in subdirectories. Hidden directories and the \
                         output directory are never searched."
        )]
        recursive: bool,

        #[arg(
            short = 'o',
            long,
            help = "Output format (png, jpeg, webp; default: png)",
            long_help = "Format of the written files. PNG and WebP are lossless, JPEG uses the \
                         encoder's default quality and drops transparency."
        )]
        format: Option<String>,

        #[arg(long, value_name = "BITS", hide = true)]
        colorbits: Option<u8>,
    },

    #[command(
        about = "Show dimensions and compressibility of one image",
        long_about = "Decode a single image and report its dimensions, file size, normalized \
                      PNG size and bytes per pixel. With --filesize, also show the decision \
                      reduce would take for it."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,

        #[arg(
            short = 'f',
            long,
            value_name = "KB",
            help = "Preview the resize decision under this per-file budget"
        )]
        filesize: Option<u64>,
    },
}
